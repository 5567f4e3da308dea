//! Field parsers: value normalization, error classification, app identity.

pub mod app;
pub mod codec;
pub mod error;
pub mod inspect;
pub mod registry;
pub mod value;

pub use app::{AppInfo, AppParser};
pub use error::{ErrorParser, ErrorTypeFilter, HttpErrorData, HttpRequestConfig, ParsedError};
pub use inspect::inspect;
pub use registry::{DEFAULT_PARSER, ERROR_FIELD, FieldParser, Parse, ParserRegistry};
pub use value::ValueParser;

#[cfg(test)]
pub(crate) mod test_support {
    /// 1000+ characters of filler text.
    pub const LOREM: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. Nulla ultricies purus et nulla tempus, egestas rhoncus diam efficitur. Maecenas mattis, est a laoreet volutpat, sapien nisi viverra ipsum, nec elementum augue velit sit amet elit. In ut tincidunt quam, quis sollicitudin dolor. Nulla eu viverra ligula. Curabitur id odio vel ex porta rhoncus eget eu dui. Duis et arcu ut nisl suscipit scelerisque eu id justo. Curabitur a enim consectetur, pellentesque dui sit amet, elementum dui. Integer sodales placerat ligula et laoreet. Vivamus at viverra nisi, sit amet fermentum diam. Etiam volutpat id nisl volutpat fermentum. Duis sit amet velit mattis turpis rhoncus viverra. Integer in nisi at ligula pretium vehicula nec a mi. Sed id malesuada leo, id rhoncus magna. Proin ex augue, dictum sed velit faucibus, tincidunt dictum diam. Nunc nec augue non velit efficitur blandit. Morbi consequat lacinia dui, sed tempus massa vestibulum quis. Proin scelerisque interdum diam sed faucibus. Sed volutpat.";

    /// [`LOREM`] as produced by zlib at the default level.
    #[cfg(feature = "zlib-compat")]
    pub const LOREM_ZLIB: &str = "eJxNk01u3DAMha/CAxi+RNtFgCYIUKB7jsRxGOjHI5FGj1/Ssj2ztCzyfY+P+l0bZeC1a4ZYU23QWQAzyQShlk5BSLQBRl65By4LUGKZ4UNTQtAkjQNTh1WbdiCBsv8Qyqv2CWihLtihfdUS7EJkzED3uxVZ2xnekQIVu5BRhL2gmzwkNC5rttWksqLBdFyZChTuDBtv1BoO7AkKBYOiTEXMBeqiBJtTXl4O5rcCKiBcAkctAg9FK38od+g1pZ0pchmDOC2SXnqJF004ww9teHN+4Ag1cnU5oH+w1iZ4eTXv4uVReYafrmLf2II6hRlJ0NVGujpoMAON+8PQrcLafmuX+iplJIXzaygTrJSSuaa9zmRewnsOZJd/s1sLWbo1YvK4EgZqKIcnJztmPsNf3jAbv/09nfvYp+c479TO5pbnDL/EYz3Dcvzd3nVw3T/mcDUaMY3swSzZjl3jO7Sf7HzE/6ReGwkbxUZfHPzAVwEhm+E/FJ0ju1vFaOFRnfzkbJ9xKdb8s1Xra9ntezOZoeC+upUPuDtq4Jvv8nNxjkvD/IeWMIT3zSu1HJXXmsMtYYm+ge+13XhkaMvnM7cnxegZTbvmeDcG1ztamy4mnUzKl/SEfV0Wttm0eLDsHU7eMYIzgvk/hddu9A==";
}
