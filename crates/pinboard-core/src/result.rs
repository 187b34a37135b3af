use crate::error::PinboardError;

pub type PinboardResult<T> = Result<T, PinboardError>;
