//! VM errors

use thiserror::Error;

/// VM result
pub type VmResult<T> = Result<T, VmError>;

/// Runtime failures while executing DOIL
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VmError {
    #[error("division by zero in `{0}`")]
    DivisionByZero(String),

    #[error("variable `{0}` is not declared")]
    UndeclaredVariable(String),

    #[error("register r{0} is read before it is written")]
    UnsetRegister(usize),
}
