#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use crunchy_buffer as buffer;
pub use crunchy_serialize as serialize;
pub use crunchy_utils as utils;
