pub mod repl;

pub use repl::run;
