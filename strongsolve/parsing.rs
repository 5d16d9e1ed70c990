//! Parsing utilities

/// Implement [`std::str::FromStr`] using parser. Type must have `parse` method implemented.
macro_rules! impl_from_str_via_parser {
    ($t: ident) => {
        impl std::str::FromStr for $t {
            type Err = &'static str;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match $t::parse($crate::parsing::Parser::new(s)) {
                    Some((p, result)) if p.input.is_empty() => Ok(result),
                    Some(_) => Err("Parse error: leftover input"),
                    None => Err("Parse error: parser failed"),
                }
            }
        }

        #[cfg(feature = "serde")]
        impl serde::Serialize for $t {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.to_string())
            }
        }

        #[cfg(feature = "serde")]
        impl<'de> serde::Deserialize<'de> for $t {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                use std::str::FromStr;

                $t::from_str(&String::deserialize(deserializer)?).map_err(serde::de::Error::custom)
            }
        }
    };
}
pub(crate) use impl_from_str_via_parser;

#[must_use]
#[derive(Debug, Clone, Copy)]
/// `const`-capable string parser
pub struct Parser<'s> {
    /// Remaining unparsed input
    pub input: &'s str,
}

impl<'s> Parser<'s> {
    /// Create new parser marking the beginning of the input
    pub const fn new(input: &'s str) -> Parser<'s> {
        Parser { input }
    }

    /// Remove whitespace from the beginning of the input
    pub const fn trim_whitespace(self) -> Parser<'s> {
        let mut bs = self.input.as_bytes();
        loop {
            match bs {
                [b'\t' | b'\n' | b'\r' | b' ', rest @ ..] => bs = rest,
                _ => {
                    return Parser {
                        input: {
                            // const-hack
                            match core::str::from_utf8(bs) {
                                Ok(input) => input,
                                Err(_) => unreachable!(),
                            }
                        },
                    };
                }
            }
        }
    }

    /// Parse an exact ascii keyword from the beginning of the input
    pub const fn parse_keyword(self, keyword: &str) -> Option<Parser<'s>> {
        let bs = self.input.as_bytes();
        let ks = keyword.as_bytes();

        if bs.len() < ks.len() {
            return None;
        }

        let mut idx = 0;
        while idx < ks.len() {
            if bs[idx] != ks[idx] {
                return None;
            }
            idx += 1;
        }

        let (_, rest) = bs.split_at(idx);
        Some(Parser {
            // const-hack
            input: match core::str::from_utf8(rest) {
                Ok(input) => input,
                Err(_) => unreachable!(),
            },
        })
    }
}
