/*!
    Progress reporting.
*/

/**
    Receives the fraction of the pipeline completed, in `0.0..=1.0`.

    Implemented for any `FnMut(f64)` closure.
*/
pub trait ProgressListener {
    fn on_progress(&mut self, progress: f64);
}

impl<F: FnMut(f64)> ProgressListener for F {
    fn on_progress(&mut self, progress: f64) {
        self(progress)
    }
}
