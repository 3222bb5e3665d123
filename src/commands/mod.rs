use bathbot_interactions::Command;

mod echo;
mod pages;
mod ping;
mod poll;

pub fn commands() -> Vec<Command> {
    vec![echo::echo(), pages::pages(), ping::ping(), poll::poll()]
}
