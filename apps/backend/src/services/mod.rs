pub mod game_flow;
pub mod records;
pub mod rooms;
pub mod watchdog;

#[cfg(test)]
mod tests_flow;
#[cfg(test)]
mod tests_watchdog;
