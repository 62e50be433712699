use std::path::PathBuf;

use clap::{value_parser, Arg, Command};

pub fn arg_parser() -> Command {
    Command::new("tunr")
        .about("Book catalog service")
        .subcommand_required(true)
        .arg(
            Arg::new("database")
                .long("database")
                .short('d')
                .global(true)
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("Database file, overrides DATABASE_URL and the configuration"),
        )
        .subcommand(
            Command::new("serve").about("Serve the catalog over HTTP").arg(
                Arg::new("port")
                    .long("port")
                    .short('p')
                    .value_parser(value_parser!(u16)),
            ),
        )
        .subcommand(Command::new("backup").about("Write the whole catalog to stdout as JSON"))
        .subcommand(
            Command::new("restore")
                .about("Replace the catalog with a JSON backup")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
        .subcommand(Command::new("export").about("Write all books to stdout as CSV"))
        .subcommand(Command::new("seed-genres").about("Add the default set of genres"))
        .subcommand(Command::new("config").about("Print the default configuration"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_command() {
        arg_parser().debug_assert();
    }

    #[test]
    fn global_database_flag() {
        let matches = arg_parser()
            .try_get_matches_from(["tunr", "serve", "--database", "books.db", "-p", "8080"])
            .unwrap();
        assert_eq!(
            matches.get_one::<PathBuf>("database"),
            Some(&PathBuf::from("books.db"))
        );
        let (name, serve) = matches.subcommand().unwrap();
        assert_eq!(name, "serve");
        assert_eq!(serve.get_one::<u16>("port"), Some(&8080));
    }
}
