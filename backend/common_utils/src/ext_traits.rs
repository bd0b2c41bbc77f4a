//! This module holds traits for extending functionalities for existing datatypes
//! & inbuilt datatypes.

use error_stack::ResultExt;
use serde::{Deserialize, Serialize};

use crate::{consts, errors};

/// Extending functionalities of Wrapper types for idiomatic
pub trait Encode<'e>
where
    Self: 'e + std::fmt::Debug,
{
    /// Converting `Self` into an `application/x-www-form-urlencoded` string
    fn url_encode(&'e self) -> errors::CustomResult<String, errors::ParsingError>
    where
        Self: Serialize;
}

impl<'e, A> Encode<'e> for A
where
    Self: 'e + std::fmt::Debug,
{
    fn url_encode(&'e self) -> errors::CustomResult<String, errors::ParsingError>
    where
        Self: Serialize,
    {
        serde_urlencoded::to_string(self)
            .change_context(errors::ParsingError::EncodeError("url-encoded"))
            .attach_printable_lazy(|| format!("Unable to convert {self:?} to a query string"))
    }
}

/// Extending functionalities of `[u8]` for performing parsing
pub trait ByteSliceExt {
    /// Convert `[u8]` into type `<T>` by using `serde::Deserialize`.
    /// A leading UTF-8 byte order mark is ignored.
    fn parse_struct<'de, T>(
        &'de self,
        type_name: &'static str,
    ) -> errors::CustomResult<T, errors::ParsingError>
    where
        T: Deserialize<'de>;

    /// True when the slice holds nothing but whitespace (or a lone byte order mark).
    fn is_blank(&self) -> bool;
}

impl ByteSliceExt for [u8] {
    fn parse_struct<'de, T>(
        &'de self,
        type_name: &'static str,
    ) -> errors::CustomResult<T, errors::ParsingError>
    where
        T: Deserialize<'de>,
    {
        serde_json::from_slice(strip_bom(self))
            .change_context(errors::ParsingError::StructParseFailure(type_name))
            .attach_printable_lazy(|| {
                format!(
                    "Unable to parse {type_name} from bytes {:?}",
                    String::from_utf8_lossy(self)
                )
            })
    }

    fn is_blank(&self) -> bool {
        strip_bom(self).iter().all(u8::is_ascii_whitespace)
    }
}

fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(&consts::UTF8_BOM).unwrap_or(bytes)
}
