use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("You cannot create an EnergySystem with year = {year}")]
    InvalidYear { year: String },

    #[error("Time step {index} is outside the {what} ({len} steps)")]
    IndexOob {
        what: &'static str,
        index: usize,
        len: usize,
    },
}
