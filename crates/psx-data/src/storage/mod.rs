//! 저장소 모듈.

pub mod csv_sink;
