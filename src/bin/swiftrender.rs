use std::{io::Write, path::PathBuf};

use anyhow::{Result, bail, anyhow, Context};
use clap::Parser as ClapParser;
use swiftrender::{args::{Args as TemplateArgs, args_from_value},
                  config::RenderConfig,
                  render::SwiftRender,
                  slot::SlotKind,
                  template::RawFileEngine};


#[derive(clap::Parser, Debug)]
/// Render a template slot with static templates (the files are
/// copied, not executed) and print the result.
struct Args {
    /// The slot to render, one of "index", "buffer", "view" or
    /// "partial".
    #[clap(required(true))]
    slot: String,

    /// File list (`a|!b`) for index and view, or the partial key.
    name: Option<String>,

    /// JSON file with the directories and file ending; without it,
    /// the SWIFTRENDER_* env vars are used.
    #[clap(long)]
    config: Option<PathBuf>,

    /// Template variables, as a JSON object
    #[clap(long)]
    args: Option<String>,

    /// Text for the buffer slot
    #[clap(long)]
    buffer: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => RenderConfig::from_json_file(path)?,
        None => RenderConfig::from_env()?,
    };
    let template_args: TemplateArgs = match &args.args {
        Some(s) => args_from_value(serde_json::from_str(s).with_context(
            || anyhow!("parsing --args as JSON"))?),
        None => TemplateArgs::new(),
    };

    let mut render = SwiftRender::from_config(RawFileEngine, &config);
    let slot = SlotKind::maybe_from(&args.slot).ok_or_else(
        || anyhow!("unknown slot {:?}, expecting one of {:?}",
                   args.slot,
                   SlotKind::members().iter().map(|s| s.as_str()).collect::<Vec<_>>()))?;
    let name = || args.name.as_deref().ok_or_else(
        || anyhow!("need a template name for the {slot} slot"));
    let output = match slot {
        SlotKind::Index => {
            render.set_index(name()?, template_args);
            render.index(None).get(None)?
        }
        SlotKind::View => {
            render.set_view(name()?, template_args);
            render.view(None).get(None)?
        }
        SlotKind::Partial => {
            let key = name()?;
            render.set_partial(key, template_args, None)?;
            render.partial(key).get(None)?
        }
        SlotKind::Buffer => {
            if args.name.is_some() {
                bail!("the buffer slot takes its text from --buffer")
            }
            render.set_buffer(args.buffer.clone().unwrap_or_default());
            render.buffer().get(None)?
        }
    };

    let mut outp = std::io::stdout().lock();
    outp.write_all(output.as_bytes())?;
    outp.flush()?;
    Ok(())
}
