use super::lookup_ui::is_interactive;
use super::prompts;
use super::AppContext;
use crate::output::Output;
use color_eyre::Result;

pub async fn run_clear(ctx: &AppContext, watched: bool, yes: bool, output: &Output) -> Result<()> {
    if !watched {
        output.warn("No clear option specified. Use --watched");
        output.info("\nExample: popcorn clear --watched");
        return Ok(());
    }

    let mut list = ctx.watched()?;
    if list.is_empty() {
        output.info("Watched list is already empty");
        return Ok(());
    }

    if !yes {
        if !is_interactive() {
            return Err(color_eyre::eyre::eyre!("Refusing to clear without confirmation; pass --yes"));
        }
        let prompt = format!("Remove all {} movies from your watched list?", list.len());
        if !prompts::prompt_yes_no(&prompt, false)? {
            output.info("Nothing removed");
            return Ok(());
        }
    }

    let count = list.len();
    list.clear();
    output.success(format!("Removed {} movies from your watched list", count));
    Ok(())
}
