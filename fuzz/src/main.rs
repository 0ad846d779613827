use peejay::{Extensions, Null, Parser};

#[macro_use]
extern crate afl;

fn main() {
    fuzz!(|data: &[u8]| {
        // The first byte picks a chunk size so the fuzzer also explores
        // chunk-boundary handling; the rest is the document.
        let (chunk, doc) = match data.split_first() {
            Some((&c, rest)) => (usize::from(c).max(1), rest),
            None => return,
        };

        let mut strict = Parser::new(Null);
        let mut relaxed = Parser::with_extensions(Null, Extensions::ALL);
        for piece in doc.chunks(chunk) {
            strict.input(piece);
            relaxed.input(piece);
        }
        strict.eof();
        relaxed.eof();

        // Anything the strict grammar accepts, the relaxed grammar must
        // accept too.
        if !strict.has_error() {
            assert!(!relaxed.has_error());
        }
    });
}
