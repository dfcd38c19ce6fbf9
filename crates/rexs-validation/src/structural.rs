//! Structural validation of parsed documents

/// Pass/fail structural gate run before any typed decoding.
///
/// Implementations append one message per violation to `errors` and return
/// `false` when at least one was found.
pub trait StructuralValidator<D: ?Sized> {
    fn validate(&self, document: &D, errors: &mut Vec<String>) -> bool;
}
