pub mod consoles;
pub mod health;
pub mod tags;
pub mod users;
pub mod videogames;
