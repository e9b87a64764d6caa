//! Display errors

/// Display driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// I2C transfer to the panel failed
    Communication,
    /// Panel not initialized
    NotInitialized,
}
