pub mod errors;
pub mod db;
pub mod historico;

#[cfg(test)]
mod tests;
