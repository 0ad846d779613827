use super::token::{TokenMatch, TokenText};
use super::{consumed, retry, Step};
use crate::backend::Backend;
use crate::error::Error;
use crate::extensions::Extensions;
use crate::grammar;
use crate::parser::Context;
use crate::policies::{integer_range, Policies};

// Grammar (from RFC 8259):
//     number = [ minus ] int [ frac ] [ exp ]
//     int    = zero / ( digit1-9 *DIGIT )
//     frac   = decimal-point 1*DIGIT
//     exp    = e [ minus / plus ] 1*DIGIT
//
// The numbers extension adds hexadecimal integers (0x…), leading and
// trailing decimal points, and the Infinity and NaN tokens; leading_plus
// permits a plus sign where the minus may appear.

/// Matches a number.
pub(crate) struct NumberMatcher {
    state: State,
    /// Matches the tails of the `Infinity` and `NaN` tokens.
    text: TokenText,
    is_neg: bool,
    acc: Accumulator,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum State {
    LeadingMinus,
    IntegerInitialDigit,
    IntegerDigit,

    Frac,
    FracInitialDigit,
    FracDigit,

    ExponentSign,
    ExponentInitialDigit,
    ExponentDigit,

    InitialHexDigit,
    HexDigits,

    /// The same as FracInitialDigit but entered after a leading dot, so
    /// that a lone dot character can be rejected.
    InitialDot,

    MatchInfinity,
    MatchNan,
    EndToken,
    Done,
}

enum Accumulator {
    Int(u64),
    Float(FloatAccumulator),
}

struct FloatAccumulator {
    whole: f64,
    frac: f64,
    frac_scale: f64,
    exponent: u32,
    exp_is_negative: bool,
    /// Set for the Infinity and NaN literals, whose values skip the
    /// out-of-range checks that apply to computed floats.
    literal: bool,
}

impl FloatAccumulator {
    /// Promote from the integer accumulator.
    fn from_int(v: u64) -> Self {
        Self::new(v as f64, false)
    }

    /// Assign an explicit value (Infinity or NaN).
    fn from_literal(v: f64) -> Self {
        Self::new(v, true)
    }

    fn new(whole: f64, literal: bool) -> Self {
        FloatAccumulator {
            whole,
            frac: 0.0,
            frac_scale: 1.0,
            exponent: 0,
            exp_is_negative: false,
            literal,
        }
    }

    fn add_frac_digit(&mut self, digit: u32) {
        self.frac = self.frac * 10.0 + f64::from(digit);
        self.frac_scale *= 10.0;
    }
}

impl NumberMatcher {
    pub(crate) fn new() -> Self {
        NumberMatcher {
            state: State::LeadingMinus,
            text: TokenText::default(),
            is_neg: false,
            acc: Accumulator::Int(0),
        }
    }

    pub(crate) fn is_done(&self) -> bool {
        self.state == State::Done
    }

    pub(crate) fn consume<B: Backend, P: Policies>(
        &mut self,
        ctx: &mut Context<B, P>,
        ch: Option<char>,
    ) -> Step {
        let Some(c) = ch else {
            return self.end(ctx);
        };
        match self.state {
            State::LeadingMinus => self.leading_minus(ctx, c),
            State::IntegerInitialDigit => self.integer_initial_digit(ctx, c),
            State::IntegerDigit => self.integer_digit(ctx, c),
            State::Frac => self.frac(ctx, c),
            State::InitialDot | State::FracInitialDigit | State::FracDigit => {
                self.frac_digit(ctx, c)
            }
            State::ExponentSign => self.exponent_sign(ctx, c),
            State::ExponentInitialDigit | State::ExponentDigit => self.exponent_digit(ctx, c),
            State::InitialHexDigit => {
                if !c.is_ascii_hexdigit() {
                    self.fail(ctx, Error::ExpectedDigits);
                    return consumed();
                }
                self.state = State::HexDigits;
                self.hex_digit(ctx, c)
            }
            State::HexDigits => self.hex_digit(ctx, c),
            State::MatchInfinity | State::MatchNan => {
                match self.text.advance(c) {
                    TokenMatch::More => {}
                    TokenMatch::Match => {
                        self.acc = Accumulator::Float(FloatAccumulator::from_literal(
                            if self.state == State::MatchInfinity {
                                f64::INFINITY
                            } else {
                                f64::NAN
                            },
                        ));
                        self.state = State::EndToken;
                    }
                    TokenMatch::Fail => self.fail(ctx, Error::UnrecognizedToken),
                }
                consumed()
            }
            State::EndToken => {
                if grammar::is_identifier_part(c) {
                    self.fail(ctx, Error::UnrecognizedToken);
                    return consumed();
                }
                self.complete(ctx);
                retry()
            }
            State::Done => consumed(),
        }
    }

    fn leading_minus<B: Backend, P: Policies>(&mut self, ctx: &mut Context<B, P>, c: char) -> Step {
        match c {
            '-' => {
                self.is_neg = true;
                self.state = State::IntegerInitialDigit;
                consumed()
            }
            '+' => {
                debug_assert!(ctx.extension(Extensions::LEADING_PLUS));
                self.state = State::IntegerInitialDigit;
                consumed()
            }
            '.' => {
                debug_assert!(ctx.extension(Extensions::NUMBERS));
                self.state = State::InitialDot;
                consumed()
            }
            '0'..='9' => {
                self.state = State::IntegerInitialDigit;
                self.integer_initial_digit(ctx, c)
            }
            _ => {
                // A minus must be followed by the 'int' production. The
                // root matcher only dispatches here on a numeric lead, so
                // this cannot be reached from the public surface.
                self.fail(ctx, Error::UnrecognizedToken);
                consumed()
            }
        }
    }

    /// The first character of the 'int' production.
    fn integer_initial_digit<B: Backend, P: Policies>(
        &mut self,
        ctx: &mut Context<B, P>,
        c: char,
    ) -> Step {
        match c {
            '0' => self.state = State::Frac,
            '1'..='9' => {
                self.acc = Accumulator::Int(u64::from(c) - u64::from('0'));
                self.state = State::IntegerDigit;
            }
            'I' => {
                self.text = TokenText::new("nfinity");
                self.state = State::MatchInfinity;
            }
            'N' => {
                self.text = TokenText::new("aN");
                self.state = State::MatchNan;
            }
            _ => self.fail(ctx, Error::UnrecognizedToken),
        }
        consumed()
    }

    fn integer_digit<B: Backend, P: Policies>(&mut self, ctx: &mut Context<B, P>, c: char) -> Step {
        match c {
            '.' => {
                self.number_is_float();
                self.state = State::FracInitialDigit;
                consumed()
            }
            'e' | 'E' => {
                self.number_is_float();
                self.state = State::ExponentSign;
                consumed()
            }
            '0'..='9' => {
                let Accumulator::Int(acc) = &mut self.acc else {
                    unreachable!("integer digits accumulate in the integer variant");
                };
                match acc
                    .checked_mul(10)
                    .and_then(|v| v.checked_add(u64::from(c) - u64::from('0')))
                {
                    Some(v) => *acc = v,
                    None => self.fail(ctx, Error::NumberOutOfRange),
                }
                consumed()
            }
            _ => {
                self.complete(ctx);
                retry()
            }
        }
    }

    /// Entered after a leading zero: a fraction, an exponent, or (with the
    /// numbers extension) a hexadecimal prefix may follow, but not another
    /// digit.
    fn frac<B: Backend, P: Policies>(&mut self, ctx: &mut Context<B, P>, c: char) -> Step {
        match c {
            '.' => {
                self.state = State::FracInitialDigit;
                consumed()
            }
            'e' | 'E' => {
                self.state = State::ExponentSign;
                consumed()
            }
            '0'..='9' => {
                // Digits cannot follow a leading zero. They are definitely
                // not part of the next token, so error out right here.
                self.fail(ctx, Error::NumberOutOfRange);
                consumed()
            }
            'x' | 'X' => {
                if ctx.extension(Extensions::NUMBERS) {
                    self.state = State::InitialHexDigit;
                } else {
                    self.fail(ctx, Error::NumberOutOfRange);
                }
                consumed()
            }
            _ => {
                // The 'frac' production is optional.
                self.complete(ctx);
                retry()
            }
        }
    }

    fn frac_digit<B: Backend, P: Policies>(&mut self, ctx: &mut Context<B, P>, c: char) -> Step {
        let initial = self.state != State::FracDigit;
        match c {
            'e' | 'E' => {
                self.number_is_float();
                if initial {
                    // "1.e5" has no digit between the dot and the exponent.
                    self.fail(ctx, Error::UnrecognizedToken);
                } else {
                    self.state = State::ExponentSign;
                }
                consumed()
            }
            '0'..='9' => {
                self.number_is_float();
                if let Accumulator::Float(acc) = &mut self.acc {
                    acc.add_frac_digit(c as u32 - '0' as u32);
                }
                self.state = State::FracDigit;
                consumed()
            }
            _ => {
                if (initial && !ctx.extension(Extensions::NUMBERS))
                    || self.state == State::InitialDot
                {
                    // A lone dot, or a trailing dot without the numbers
                    // extension.
                    self.fail(ctx, Error::UnrecognizedToken);
                    consumed()
                } else {
                    self.complete(ctx);
                    retry()
                }
            }
        }
    }

    fn exponent_sign<B: Backend, P: Policies>(&mut self, ctx: &mut Context<B, P>, c: char) -> Step {
        self.number_is_float();
        self.state = State::ExponentInitialDigit;
        match c {
            '+' | '-' => {
                if let Accumulator::Float(acc) = &mut self.acc {
                    acc.exp_is_negative = c == '-';
                }
                consumed()
            }
            _ => self.exponent_digit(ctx, c),
        }
    }

    fn exponent_digit<B: Backend, P: Policies>(
        &mut self,
        ctx: &mut Context<B, P>,
        c: char,
    ) -> Step {
        match c {
            '0'..='9' => {
                if let Accumulator::Float(acc) = &mut self.acc {
                    // Saturate: any exponent this large overflows the float
                    // range and is reported on emission.
                    acc.exponent = acc
                        .exponent
                        .saturating_mul(10)
                        .saturating_add(c as u32 - '0' as u32);
                }
                self.state = State::ExponentDigit;
                consumed()
            }
            _ => {
                if self.state == State::ExponentInitialDigit {
                    self.fail(ctx, Error::UnrecognizedToken);
                    consumed()
                } else {
                    self.complete(ctx);
                    retry()
                }
            }
        }
    }

    fn hex_digit<B: Backend, P: Policies>(&mut self, ctx: &mut Context<B, P>, c: char) -> Step {
        let Some(digit) = c.to_digit(16) else {
            self.complete(ctx);
            return retry();
        };
        let Accumulator::Int(acc) = &mut self.acc else {
            unreachable!("hex digits accumulate in the integer variant");
        };
        match acc
            .checked_mul(16)
            .and_then(|v| v.checked_add(u64::from(digit)))
        {
            Some(v) => *acc = v,
            None => self.fail(ctx, Error::NumberOutOfRange),
        }
        consumed()
    }

    fn number_is_float(&mut self) {
        if let Accumulator::Int(v) = self.acc {
            self.acc = Accumulator::Float(FloatAccumulator::from_int(v));
        }
    }

    fn in_terminal_state(&self) -> bool {
        matches!(
            self.state,
            State::EndToken
                | State::ExponentDigit
                | State::FracDigit
                | State::Frac
                | State::HexDigits
                | State::IntegerDigit
                | State::Done
        )
    }

    /// End of input.
    fn end<B: Backend, P: Policies>(&mut self, ctx: &mut Context<B, P>) -> Step {
        if !self.in_terminal_state() {
            match self.state {
                State::MatchInfinity | State::MatchNan => {
                    self.fail(ctx, Error::UnrecognizedToken);
                    return consumed();
                }
                // A trailing dot is permitted by the numbers extension.
                State::FracInitialDigit if ctx.extension(Extensions::NUMBERS) => {}
                _ => {
                    self.fail(ctx, Error::ExpectedDigits);
                    return consumed();
                }
            }
        }
        self.complete(ctx);
        consumed()
    }

    fn complete<B: Backend, P: Policies>(&mut self, ctx: &mut Context<B, P>) {
        self.state = State::Done;
        self.make_result(ctx);
    }

    fn make_result<B: Backend, P: Policies>(&mut self, ctx: &mut Context<B, P>) {
        if ctx.has_error() {
            return;
        }
        let (min, max) = integer_range::<P>();
        let result = match &self.acc {
            Accumulator::Int(acc) => {
                let magnitude = i128::from(*acc);
                let value = if self.is_neg { -magnitude } else { magnitude };
                if value < min || value > max {
                    Err(Error::NumberOutOfRange)
                } else {
                    ctx.backend.integer_value(value as i64)
                }
            }
            Accumulator::Float(acc) => {
                if acc.literal {
                    let value = if self.is_neg { -acc.whole } else { acc.whole };
                    ctx.backend.double_value(value)
                } else {
                    self.make_float_result(ctx, acc_value(acc, self.is_neg), min, max)
                }
            }
        };
        if let Err(err) = result {
            ctx.record_error(err);
        }
    }

    fn make_float_result<B: Backend, P: Policies>(
        &self,
        ctx: &mut Context<B, P>,
        value: Result<f64, Error>,
        min: i128,
        max: i128,
    ) -> Result<(), Error> {
        let value = value?;
        // Is the fractional part zero and the value in the integer range?
        // If so, emit it as an integer so that "1.0" and "1" are treated
        // the same way.
        if value.trunc() == value && value >= min as f64 && value <= max as f64 {
            return ctx.backend.integer_value(value as i64);
        }
        ctx.backend.double_value(value)
    }

    fn fail<B: Backend, P: Policies>(&mut self, ctx: &mut Context<B, P>, err: Error) {
        ctx.record_error(err);
        self.state = State::Done;
    }
}

/// Evaluate a computed (non-literal) float accumulator.
fn acc_value(acc: &FloatAccumulator, is_neg: bool) -> Result<f64, Error> {
    let mut value = acc.whole + acc.frac / acc.frac_scale;
    let exp = 10f64.powi(i32::try_from(acc.exponent).unwrap_or(i32::MAX));
    if exp.is_infinite() {
        return Err(Error::NumberOutOfRange);
    }
    value *= if acc.exp_is_negative { 1.0 / exp } else { exp };
    if is_neg {
        value = -value;
    }
    if !value.is_finite() {
        return Err(Error::NumberOutOfRange);
    }
    Ok(value)
}
