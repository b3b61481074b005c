use std::env;
use std::fs;
use std::path::Path;

use clap::CommandFactory;

// cli.rs is self-contained over clap + clap_complete (both build-deps),
// so the build script can compile it standalone and render man pages
// from the same command tree the binary exposes.
#[path = "src/cli.rs"]
mod cli;

fn main() {
    println!("cargo::rerun-if-changed=src/cli.rs");

    let out_dir = env::var_os("OUT_DIR").expect("OUT_DIR is set during builds");
    let man_dir = Path::new(&out_dir).join("man");
    fs::create_dir_all(&man_dir).expect("create man/ under OUT_DIR");

    // Walk the command tree iteratively; nested subcommands get
    // hyphenated page names (mistly-config-set-token.1).
    let mut queue = vec![cli::Cli::command()];
    while let Some(cmd) = queue.pop() {
        let name = cmd.get_name().to_owned();

        let mut page = Vec::new();
        clap_mangen::Man::new(cmd.clone())
            .render(&mut page)
            .unwrap_or_else(|err| panic!("man page for {name}: {err}"));
        fs::write(man_dir.join(format!("{name}.1")), page)
            .unwrap_or_else(|err| panic!("write {name}.1: {err}"));

        for sub in cmd.get_subcommands().filter(|sub| !sub.is_hide_set()) {
            queue.push(sub.clone().name(format!("{name}-{}", sub.get_name())));
        }
    }
}
