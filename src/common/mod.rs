use std::thread::JoinHandle;
use std::thread;
use crossbeam_channel::{Sender, Receiver};

pub fn run_worker_thread<T: Send + 'static, F: FnOnce(T) + Send + 'static>(worker : F, params : T) -> JoinHandle<()> {
    thread::spawn(move || worker(params))
}

#[derive(Debug)]
pub struct Worker {
    pub name : &'static str,
    pub join_handle : JoinHandle<()>,
    pub terminate_worker_tx : Sender<()>
}

pub fn run_worker<T: Send + 'static, F: FnOnce(T, Receiver<()>) + Send + 'static>(name : &'static str, worker : F, params : T) -> Worker {
    let (terminate_worker_tx, terminate_worker_rx): (Sender<()>, Receiver<()>) = crossbeam_channel::unbounded();

    let join_handle = thread::spawn(move|| worker (params, terminate_worker_rx));

    Worker{name, join_handle, terminate_worker_tx}
}

#[derive(Debug)]
pub struct WorkerPool {
    workers : Vec<Worker>
}

impl WorkerPool {
    pub fn new(workers : Vec<Worker>) -> WorkerPool {
        WorkerPool{workers}
    }

    pub fn terminate(&self) {
        for worker in &self.workers {
            let send_result = worker.terminate_worker_tx.send(());
            if send_result.is_err() {
                error!("Cannot send termination signal to {} worker", worker.name)
            }
        }
    }

    pub fn join(self) {
        for worker in self.workers {
            let join_result = worker.join_handle.join();
            if join_result.is_err() {
                error!("Worker {} returned an error", worker.name)
            }
        }
    }
}
