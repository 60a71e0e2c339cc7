#[cfg(test)]
pub mod common;

#[cfg(test)]
mod executor_never_throws;
