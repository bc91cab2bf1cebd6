use anyhow::Result;
use is_terminal::IsTerminal;
use std::io;

use lindup::prompt::Prompter;
use lindup::run::{run, Outcome};
use lindup::signal::{install_handler, EXIT_CODE_INTERRUPTED};
use lindup::styles::Palette;

fn main() -> Result<()> {
    let args = lindup::args::parsed();
    lindup::logging::init(args.verbose, args.quiet);
    let shutdown = install_handler();

    let palette = Palette::new(args.color);
    let stdin = io::stdin().lock();
    let outcome = if io::stdout().is_terminal() {
        run(&args, &mut Prompter::new(stdin, io::stdout().lock(), palette), &shutdown)?
    } else {
        run(&args, &mut Prompter::new(stdin, io::BufWriter::new(io::stdout().lock()), palette), &shutdown)?
    };
    log::debug!("Finished: {outcome:?}");
    if let Outcome::Interrupted(_) = outcome {
        std::process::exit(EXIT_CODE_INTERRUPTED);
    }
    Ok(())
}
