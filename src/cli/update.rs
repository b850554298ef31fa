use std::io::Write;

use clap::Args;
use realce::{
    dimensions::Quantity,
    items::{AdhesiveType, Finish, LineItemId, LineItemPatch},
    receipt::format_money,
    store::{CartStore, FileStorage},
};

use crate::cli::{CliError, amount, dimension};

#[derive(Debug, Args)]
pub(crate) struct UpdateArgs {
    /// Line item id
    id: String,

    /// New wallpaper width in metres
    #[arg(long)]
    width: Option<String>,

    /// New wallpaper height in metres
    #[arg(long)]
    height: Option<String>,

    /// Add (true) or drop (false) the wallpaper lamination
    #[arg(long)]
    lamination: Option<bool>,

    /// New wallpaper price per square metre
    #[arg(long)]
    price_per_sqm: Option<String>,

    /// New wallpaper finish (glossy, matte)
    #[arg(long)]
    finish: Option<Finish>,

    /// New wallpaper backing (with-adhesive, without-adhesive)
    #[arg(long)]
    adhesive_type: Option<AdhesiveType>,

    /// New canvas size label
    #[arg(long)]
    size: Option<String>,

    /// New quantity; anything below one becomes one
    #[arg(long, allow_negative_numbers = true)]
    quantity: Option<i64>,

    /// Treat invalid dimensions as zero instead of rejecting them
    #[arg(long)]
    lenient: bool,
}

pub(crate) fn run(
    args: UpdateArgs,
    store: &mut CartStore<FileStorage>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let currency = store.engine().config().currency;
    let id = LineItemId::from(args.id);

    let patch = LineItemPatch {
        width_m: args
            .width
            .as_deref()
            .map(|width| dimension("width", Some(width), args.lenient))
            .transpose()?,
        height_m: args
            .height
            .as_deref()
            .map(|height| dimension("height", Some(height), args.lenient))
            .transpose()?,
        lamination: args.lamination,
        price_per_sqm: args
            .price_per_sqm
            .as_deref()
            .map(|price| amount("price-per-sqm", price, currency))
            .transpose()?,
        finish: args.finish,
        adhesive_type: args.adhesive_type,
        size_label: args.size,
        quantity: args.quantity.map(Quantity::new),
    };

    if patch.is_empty() {
        writeln!(out, "nothing to update")?;

        return Ok(());
    }

    store.update(&id, &patch)?;

    if let Some(item) = store.cart().get(&id) {
        writeln!(
            out,
            "updated {id}: {} × {}",
            item.quantity(),
            format_money(&item.preco_total())
        )?;
    }

    Ok(())
}
