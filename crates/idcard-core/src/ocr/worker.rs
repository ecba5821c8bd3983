//! Dedicated thread owning an engine that cannot cross threads itself.

use std::sync::mpsc;
use std::thread;

use image::DynamicImage;
use tracing::debug;

use crate::error::OcrError;
use crate::models::fragment::Fragment;

type Reply = mpsc::Sender<Result<Vec<Fragment>, OcrError>>;

/// Handle to the worker; requests are served one at a time in arrival order.
///
/// The engine is built on the worker thread and never leaves it. Dropping the
/// handle closes the queue and the thread exits.
pub(crate) struct EngineWorker {
    jobs: mpsc::Sender<(DynamicImage, Reply)>,
}

impl EngineWorker {
    /// Start the thread, build the engine with `init`, and wait until it is ready.
    pub(crate) fn spawn<E, I, R>(name: &str, init: I, run: R) -> Result<Self, OcrError>
    where
        I: FnOnce() -> Result<E, OcrError> + Send + 'static,
        R: Fn(&E, &DynamicImage) -> Result<Vec<Fragment>, OcrError> + Send + 'static,
    {
        let (jobs, queue) = mpsc::channel::<(DynamicImage, Reply)>();
        let (ready_tx, ready_rx) = mpsc::channel();

        thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let engine = match init() {
                    Ok(engine) => {
                        let _ = ready_tx.send(Ok(()));
                        engine
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };

                for (image, reply) in queue {
                    let _ = reply.send(run(&engine, &image));
                }
                debug!("OCR worker stopped");
            })
            .map_err(|e| OcrError::ModelLoad(format!("cannot start OCR thread: {}", e)))?;

        ready_rx
            .recv()
            .map_err(|_| OcrError::ModelLoad("OCR thread exited during startup".to_string()))??;

        Ok(Self { jobs })
    }

    /// Hand an image to the worker and block until it answers.
    pub(crate) fn run(&self, image: DynamicImage) -> Result<Vec<Fragment>, OcrError> {
        let (reply, answer) = mpsc::channel();
        self.jobs
            .send((image, reply))
            .map_err(|_| OcrError::Recognition("OCR thread is not running".to_string()))?;
        answer
            .recv()
            .map_err(|_| OcrError::Recognition("OCR thread stopped before answering".to_string()))?
    }
}
