use std::io::Write;

use clap::{Args, Subcommand};
use realce::{
    items::{AdhesiveType, CanvasSelection, Finish, LineItemId, WallpaperSelection},
    receipt::format_money,
    store::{CartStore, FileStorage},
};

use crate::cli::{CliError, amount, dimension};

#[derive(Debug, Args)]
pub(crate) struct AddCommand {
    #[command(subcommand)]
    command: AddSubcommand,
}

#[derive(Debug, Subcommand)]
enum AddSubcommand {
    /// Wallpaper cut to the size of a wall
    Wallpaper(WallpaperArgs),

    /// Canvas print of a catalog size
    Canvas(CanvasArgs),
}

#[derive(Debug, Args)]
struct WallpaperArgs {
    /// Texture display name
    #[arg(long)]
    texture_name: String,

    /// Texture image URL
    #[arg(long, default_value = "")]
    texture_image: String,

    /// Catalog category of the texture
    #[arg(long, default_value = "")]
    category: String,

    /// Price per square metre, e.g. 25.00
    #[arg(long)]
    price_per_sqm: String,

    /// Wall width in metres
    #[arg(long)]
    width: Option<String>,

    /// Wall height in metres
    #[arg(long)]
    height: Option<String>,

    /// Print finish (glossy, matte)
    #[arg(long, default_value = "matte")]
    finish: Finish,

    /// Add the protective lamination
    #[arg(long)]
    lamination: bool,

    /// Backing (with-adhesive, without-adhesive)
    #[arg(long, default_value = "with-adhesive")]
    adhesive_type: AdhesiveType,

    /// Price blank or invalid dimensions at the minimum area instead of rejecting them
    #[arg(long)]
    lenient: bool,
}

#[derive(Debug, Args)]
struct CanvasArgs {
    /// Canvas display name
    #[arg(long)]
    name: String,

    /// Canvas image URL
    #[arg(long, default_value = "")]
    image: String,

    /// Size label, e.g. 50x70
    #[arg(long)]
    size: String,
}

pub(crate) fn run(
    command: AddCommand,
    store: &mut CartStore<FileStorage>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let id = match command.command {
        AddSubcommand::Wallpaper(args) => {
            let currency = store.engine().config().currency;

            let selection = WallpaperSelection {
                texture_image: args.texture_image,
                texture_name: args.texture_name,
                category: args.category,
                price_per_sqm: amount("price-per-sqm", &args.price_per_sqm, currency)?,
                width_m: dimension("width", args.width.as_deref(), args.lenient)?,
                height_m: dimension("height", args.height.as_deref(), args.lenient)?,
                finish: args.finish,
                lamination: args.lamination,
                adhesive_type: args.adhesive_type,
            };

            store.add_wallpaper(selection)?
        }
        AddSubcommand::Canvas(args) => store.add_canvas(CanvasSelection {
            canvas_image: args.image,
            canvas_name: args.name,
            size_label: args.size,
        })?,
    };

    write_added(out, store, &id)
}

fn write_added(
    out: &mut impl Write,
    store: &CartStore<FileStorage>,
    id: &LineItemId,
) -> Result<(), CliError> {
    if let Some(item) = store.cart().get(id) {
        writeln!(
            out,
            "added {} {id} at {}",
            item.kind().type_name(),
            format_money(&item.preco_total())
        )?;
    }

    Ok(())
}
