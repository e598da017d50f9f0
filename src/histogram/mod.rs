pub mod fenwick;
pub mod int_histogram;
pub mod string_histogram;
