use clap::{Parser, ValueEnum};
use color_eyre::eyre;
use ndarray::{Array, ArrayD};
use tracing::{info, Level};

use fieldslice_core::{
    component::FieldComponent,
    extract::SliceField,
    geom::Vec3U,
    grid::UniformGrid,
    view::RawView,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Slice a sequential test field (`0..n` in storage order) like a numpy array.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Index expression, e.g. "0, :, ::2"
    #[arg(default_value = "...", allow_hyphen_values = true)]
    index: String,

    /// Field dimensions
    #[arg(short, long, value_delimiter = ',', default_values_t = [4, 4, 4])]
    dims: Vec<usize>,

    /// Name of the field inside the grid
    #[arg(short, long, default_value = "data")]
    field: String,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Serve the request like a data component: planes through the grid, everything else from memory
    #[arg(long)]
    through_component: bool,

    /// More output per occurrence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let &[x, y, z] = args.dims.as_slice() else {
        eyre::bail!("Expected 3 dimensions, got {}", args.dims.len());
    };
    let dims = Vec3U::new(x, y, z);

    let data = Array::range(0.0, dims.volume() as f64, 1.0).into_shape((x, y, z))?;

    let raw: RawView = args
        .index
        .parse()
        .map_err(|err| eyre::eyre!("{:?}", miette::Report::new(err)))?;

    let field = SliceField::new(UniformGrid::from_field(&args.field, data.clone()), &args.field);
    let view = field.normalize(&raw)?;
    info!(?view, "Normalized view");

    let result: ArrayD<f64> = if args.through_component {
        FieldComponent::new(data, field)?.get(raw)?
    } else {
        field.extract(&view)?.into_dyn()
    };

    match args.format {
        Format::Text => {
            println!("shape: {:?}", result.shape());
            println!("{result}");
        }
        Format::Json => {
            let output = serde_json::json!({
                "view": view,
                "shape": result.shape(),
                "data": result,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
