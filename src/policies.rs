use num_traits::{Bounded, ToPrimitive};

/// Compile-time knobs that control the behaviour of a
/// [`Parser`](crate::Parser).
pub trait Policies {
    /// The maximum number of UTF-8 bytes permitted in a string or an
    /// identifier before a `string_too_long` or `identifier_too_long` error
    /// is raised.
    const MAX_LENGTH: usize;

    /// The integer type whose range bounds the values delivered through
    /// [`Backend::integer_value`](crate::Backend::integer_value). Values
    /// outside this range raise `number_out_of_range`. At most 64 bits wide.
    type Integer: Bounded + ToPrimitive;
}

/// The policies used unless a caller supplies its own: strings and
/// identifiers up to 65535 bytes and `i64` integers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DefaultPolicies;

impl Policies for DefaultPolicies {
    const MAX_LENGTH: usize = 65535;
    type Integer = i64;
}

/// The inclusive `(min, max)` range of the policy integer type, widened to
/// `i128` so that the magnitude of the most negative value is representable.
pub(crate) fn integer_range<P: Policies>() -> (i128, i128) {
    // Policy integers are at most 64 bits wide, so these conversions cannot
    // fail; the fallbacks keep the arithmetic total.
    let min = P::Integer::min_value().to_i128().unwrap_or(i64::MIN as i128);
    let max = P::Integer::max_value().to_i128().unwrap_or(i64::MAX as i128);
    (min, max)
}
