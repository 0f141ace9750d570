//! Provides the [`Input`] trait implemented by the inputs generated for property based tests.

use proptest::test_runner::TestCaseResult;

/// Represents an input generated for testing purposes.
///
/// An input knows the source text it renders to (through [`std::fmt::Display`]) and how the
/// analyzer's output for that text must look.
pub trait Input<Output> {
    /// Checks the output produced for the rendered input.
    ///
    /// # Errors
    /// [`proptest::test_runner::TestCaseError`]: the output does not match the input.
    fn assert(self, output: Output) -> TestCaseResult;
}
