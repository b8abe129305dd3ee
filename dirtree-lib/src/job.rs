// --- FILE: dirtree-lib/src/job.rs ---

use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

use log::{debug, error};

use crate::config::StructureConfig;
use crate::errors::{TreeError, TreeResult};
use crate::processing::{build_structure, Structure};

/// Progress notifications sent by a running [`StructureJob`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobEvent {
    /// The worker picked up the job and is about to scan the paths.
    Started { total_paths: usize },
    /// Percentage of paths filtered so far, `0..=100`.
    Progress(u8),
}

/// A structure run handed off to a worker thread.
///
/// Submitting returns immediately, so the host can show a "processing"
/// indicator before the scan starts. The scan itself is not interruptible;
/// dropping the job detaches the worker, which still runs to completion.
#[derive(Debug)]
pub struct StructureJob {
    events: Receiver<JobEvent>,
    handle: JoinHandle<TreeResult<Structure>>,
}

impl StructureJob {
    /// Moves `paths` and `config` onto a new worker thread and starts the run.
    pub fn submit(paths: Vec<String>, config: StructureConfig) -> Self {
        let (tx, rx) = mpsc::channel();
        debug!(
            "Submitting structure job for '{}' ({} paths)",
            config.root_folder_name,
            paths.len()
        );
        let handle = thread::spawn(move || {
            // A send only fails once the host dropped the receiver; the run
            // still completes so `wait` can return its result.
            let _ = tx.send(JobEvent::Started {
                total_paths: paths.len(),
            });
            build_structure(&paths, &config, |percent| {
                let _ = tx.send(JobEvent::Progress(percent));
            })
        });
        Self { events: rx, handle }
    }

    /// Blocking iterator over the job's events. It ends when the worker is
    /// done, successfully or not.
    pub fn events(&self) -> impl Iterator<Item = JobEvent> + '_ {
        self.events.iter()
    }

    /// Waits for the worker and returns the structure it produced.
    ///
    /// # Errors
    ///
    /// Returns the pipeline's own error (e.g. [`TreeError::MissingInput`]), or
    /// [`TreeError::JobPanicked`] if the worker died.
    pub fn wait(self) -> TreeResult<Structure> {
        match self.handle.join() {
            Ok(result) => result,
            Err(_) => {
                error!("Structure job worker panicked");
                Err(TreeError::JobPanicked)
            }
        }
    }
}
