use crate::models::calculation::ViewUpdate;

/// Receives every update produced by a [`CalculationView`](super::calculation_view::CalculationView).
///
/// Frontends implement this to redraw labels and charts; any
/// `FnMut(&ViewUpdate)` closure works as a listener too.
pub trait ViewListener {
    fn on_update(&mut self, update: &ViewUpdate);
}

impl<F> ViewListener for F
where
    F: FnMut(&ViewUpdate),
{
    fn on_update(&mut self, update: &ViewUpdate) {
        self(update)
    }
}
