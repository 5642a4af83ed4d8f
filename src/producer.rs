//! Sinks for objects discovered by traversals and expansions.

/// Receives objects one at a time, so algorithms report results without
/// allocating collections of their own.
pub trait Producer<O> {
    fn produce(&mut self, object: O);
}

/// Producer that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl<O> Producer<O> for Discard {
    fn produce(&mut self, _object: O) {}
}

impl<O> Producer<O> for Vec<O> {
    fn produce(&mut self, object: O) {
        self.push(object);
    }
}

impl<O, F: FnMut(O)> Producer<O> for F {
    fn produce(&mut self, object: O) {
        self(object)
    }
}
