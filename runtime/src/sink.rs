use crate::Accepted;

/// Where accepted reports end up: console, display, or a test's buffer.
pub trait ReportSink {
    fn accept(&mut self, accepted: &Accepted);

    /// Periodic redraw for sinks that show report age.
    fn refresh(&mut self) {}
}

impl ReportSink for Vec<Accepted> {
    #[inline]
    fn accept(&mut self, accepted: &Accepted) {
        self.push(accepted.clone());
    }
}

impl<S> ReportSink for Box<S>
where
    S: ReportSink + ?Sized,
{
    #[inline]
    fn accept(&mut self, accepted: &Accepted) {
        (**self).accept(accepted)
    }

    #[inline]
    fn refresh(&mut self) {
        (**self).refresh()
    }
}

impl<A, B> ReportSink for (A, B)
where
    A: ReportSink,
    B: ReportSink,
{
    fn accept(&mut self, accepted: &Accepted) {
        self.0.accept(accepted);
        self.1.accept(accepted);
    }

    fn refresh(&mut self) {
        self.0.refresh();
        self.1.refresh();
    }
}
