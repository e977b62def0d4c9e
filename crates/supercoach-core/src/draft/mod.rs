pub mod pick;
pub mod roster;
pub mod session;
pub mod state;
pub mod turn;
