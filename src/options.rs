use crate::extensions::Extensions;

/// Options for [`Parser`](crate::Parser). Use [`ParserOptionsBuilder`] to
/// create instances of this struct.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParserOptions {
    /// The grammar extensions the parser accepts
    pub(crate) extensions: Extensions,

    /// The maximum nesting depth of arrays and objects
    pub(crate) max_depth: usize,
}

impl Default for ParserOptions {
    /// Returns the default parser options: the strict JSON grammar and a
    /// nesting limit of 200
    fn default() -> Self {
        Self {
            extensions: Extensions::NONE,
            max_depth: 200,
        }
    }
}

impl ParserOptions {
    /// Returns the enabled grammar extensions
    pub fn extensions(&self) -> Extensions {
        self.extensions
    }

    /// Returns the maximum nesting depth
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

/// A builder for [`ParserOptions`]
///
/// ```rust
/// use peejay::{Extensions, Null, Parser, ParserOptionsBuilder};
///
/// let mut parser = Parser::new_with_options(
///     Null,
///     ParserOptionsBuilder::default()
///         .with_extensions(Extensions::SINGLE_LINE_COMMENTS)
///         .with_max_depth(16)
///         .build(),
/// );
/// parser.input(b"[1, 2] // that's it\n").eof();
/// assert!(!parser.has_error());
/// ```
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParserOptionsBuilder {
    options: ParserOptions,
}

impl ParserOptionsBuilder {
    /// Enable a set of grammar extensions. Repeated calls accumulate flags.
    pub fn with_extensions(mut self, extensions: Extensions) -> Self {
        self.options.extensions |= extensions;
        self
    }

    /// Set the maximum depth to which arrays and objects may nest. The limit
    /// exists to stop hostile inputs from growing the parse stack without
    /// bound; the default of 200 is ample for any reasonable document.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.options.max_depth = max_depth;
        self
    }

    /// Create a new [`ParserOptions`] object
    pub fn build(self) -> ParserOptions {
        self.options
    }
}

#[cfg(test)]
mod test {
    use super::{ParserOptions, ParserOptionsBuilder};
    use crate::extensions::Extensions;

    #[test]
    fn defaults() {
        let options = ParserOptions::default();
        assert_eq!(options.extensions(), Extensions::NONE);
        assert_eq!(options.max_depth(), 200);
    }

    #[test]
    fn builder_accumulates_extensions() {
        let options = ParserOptionsBuilder::default()
            .with_extensions(Extensions::BASH_COMMENTS)
            .with_extensions(Extensions::NUMBERS)
            .with_max_depth(4)
            .build();
        assert!(options.extensions().contains(Extensions::BASH_COMMENTS));
        assert!(options.extensions().contains(Extensions::NUMBERS));
        assert_eq!(options.max_depth(), 4);
    }
}
