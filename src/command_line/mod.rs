pub mod assemble;

pub mod prelude {
    pub use clap::{Arg, ArgAction, ArgMatches, Command};
}
