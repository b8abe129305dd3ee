// --- FILE: dirtree-lib/src/tree.rs ---

use std::collections::HashMap;

use log::debug;

use crate::utils::SEGMENT_SEPARATOR;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE_INDENT: &str = "│   ";
const SPACE_INDENT: &str = "    ";

/// One directory level: segment names mapped to child nodes.
///
/// Children keep the order in which they were first inserted. A node without
/// children is a leaf; files and empty directories are not distinguished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeNode {
    children: Vec<(String, TreeNode)>,
    index: HashMap<String, usize>,
}

impl TreeNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&TreeNode> {
        self.index.get(name).map(|&i| &self.children[i].1)
    }

    /// Child names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(|(name, _)| name.as_str())
    }

    /// `(name, child)` pairs in insertion order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &TreeNode)> {
        self.children.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Total number of nodes below this one.
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|(_, child)| 1 + child.descendant_count())
            .sum()
    }

    /// Returns the child called `name`, appending an empty one first if it
    /// does not exist yet.
    pub fn child_or_insert(&mut self, name: &str) -> &mut TreeNode {
        let position = match self.index.get(name) {
            Some(&i) => i,
            None => {
                let i = self.children.len();
                self.children.push((name.to_string(), TreeNode::new()));
                self.index.insert(name.to_string(), i);
                i
            }
        };
        &mut self.children[position].1
    }

    /// Walks `path` segment by segment, creating missing nodes.
    pub fn insert_path(&mut self, path: &str) {
        let mut node = self;
        for segment in path.split(SEGMENT_SEPARATOR) {
            node = node.child_or_insert(segment);
        }
    }

    fn reindex(&mut self) {
        self.index = self
            .children
            .iter()
            .enumerate()
            .map(|(i, (name, _))| (name.clone(), i))
            .collect();
    }
}

/// Builds the directory hierarchy described by `paths`.
///
/// The result is the set-union of every path's segment sequence. Keys at each
/// level are enumerated in first-insertion order, so feeding the same paths in
/// a different order yields the same shape but possibly a different order.
pub fn build_tree<I, S>(paths: I) -> TreeNode
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut root = TreeNode::new();
    let mut count = 0usize;
    for path in paths {
        let path = path.as_ref();
        if path.split(SEGMENT_SEPARATOR).any(str::is_empty) {
            debug!("Path '{}' contains an empty segment; keeping it as a key", path);
        }
        root.insert_path(path);
        count += 1;
    }
    debug!(
        "Built tree from {} paths ({} nodes)",
        count,
        root.descendant_count()
    );
    root
}

/// Removes every node called `blocked_name`, at any depth, together with
/// everything beneath it. Returns how many nodes named `blocked_name` were
/// removed. Pruning a tree without a match is a no-op.
pub fn prune_tree(root: &mut TreeNode, blocked_name: &str) -> usize {
    let before = root.children.len();
    root.children.retain(|(name, _)| name != blocked_name);
    let mut removed = before - root.children.len();
    if removed > 0 {
        root.reindex();
    }
    for (_, child) in root.children.iter_mut() {
        removed += prune_tree(child, blocked_name);
    }
    removed
}

/// Renders `root` as box-drawing lines, one per node, depth first.
///
/// Every line is `indent + connector + name`; the last sibling uses `└── `,
/// the others `├── `. Children are indented by `│   ` under a non-last
/// sibling and by four spaces under the last one.
pub fn render_tree(root: &TreeNode, indent: &str) -> Vec<String> {
    let mut lines = Vec::new();
    render_into(root, indent, &mut lines);
    lines
}

fn render_into(node: &TreeNode, indent: &str, lines: &mut Vec<String>) {
    let count = node.children.len();
    for (i, (name, child)) in node.children.iter().enumerate() {
        let is_last = i + 1 == count;
        let connector = if is_last { LAST_BRANCH } else { BRANCH };
        lines.push(format!("{}{}{}", indent, connector, name));

        if !child.is_leaf() {
            let child_indent = format!(
                "{}{}",
                indent,
                if is_last { SPACE_INDENT } else { PIPE_INDENT }
            );
            render_into(child, &child_indent, lines);
        }
    }
}

/// Full line list for a run: the root folder name, then the rendered tree.
pub fn render_structure_lines(root_folder_name: &str, root: &TreeNode) -> Vec<String> {
    let mut lines = Vec::with_capacity(root.descendant_count() + 1);
    lines.push(root_folder_name.to_string());
    render_into(root, "", &mut lines);
    lines
}
