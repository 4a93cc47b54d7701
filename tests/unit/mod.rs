mod actions;
mod cli_env;
mod executor;
mod generator;
mod modes;
mod selection;
