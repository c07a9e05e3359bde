use std::{fs::File,
          io::{BufWriter, Write},
          path::PathBuf};
use anyhow::Result;
use clap::Parser;
use rgb::RGB8;
use tracing_subscriber::EnvFilter;
use spectral_ramp::{build_style, load_config, Action, BandKey, ColorRange, ColorStops,
                    ColormapName, PaletteType, PortalConfig, RGBColor, SpectralIndex};

/// Print the render style of a portal view as JSON.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// RON portal config (defaults are used without it)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// spectral index to select, e.g. ndvi
    #[arg(short, long)]
    index: Option<SpectralIndex>,

    /// colormap, or "none" for the raw bands
    #[arg(short, long)]
    palette: Option<ColormapName>,

    #[arg(long)]
    reverse: bool,

    /// layers appended after the index's own, e.g. TIR1
    #[arg(long = "add", num_args = 1..)]
    add: Vec<BandKey>,

    /// also write an HTML page with the colormaps and the current stops
    #[arg(long)]
    html: Option<PathBuf>,
}

fn css_string(c: RGB8) -> String {
    format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
}

fn table_of_colors(fh: &mut impl Write, colors: &[String],
                   width: u32, comment: &str) -> Result<()> {
    writeln!(fh, "<table style=\"border: 0px;  border-spacing: 0px\"><tr>")?;
    for c in colors {
        writeln!(fh, "  <td style=\"width: {width}px; height: 30px; \
                      background-color: {c}\"></td>")?;
    }
    writeln!(fh, "<td style=\"padding-left: 7px\">{comment}</td></tr></table><br/>")?;
    Ok(())
}

fn write_html(path: &PathBuf, stops: &ColorStops, comment: &str) -> Result<()> {
    let mut fh = BufWriter::new(File::create(path)?);
    writeln!(fh, "<html>\n<head>\n<title>Colormaps</title>\n</head>\n<body>")?;
    writeln!(fh, "<h3>Colormaps</h3>")?;
    for name in ColormapName::ALL {
        if let Some(cmap) = RGB8::colormap(name) {
            let kind = match cmap.typ() {
                PaletteType::Seq => "sequential",
                PaletteType::Div => "diverging",
            };
            let defining: Vec<_> = cmap.colors().into_iter().map(css_string).collect();
            table_of_colors(&mut fh, &defining, 40,
                            &format!("{name} ({kind}, {} stops)", cmap.len()))?;
            let colors: Vec<_> = cmap.range(0., 1., 150).map(|(_, c)| css_string(c)).collect();
            table_of_colors(&mut fh, &colors, 1, &format!("{name} (interpolated)"))?;
        }
    }
    writeln!(fh, "<h3>Color stops</h3>")?;
    let colors: Vec<_> = stops.iter().map(|s| s.css_color()).collect();
    table_of_colors(&mut fh, &colors, 40, comment)?;
    writeln!(fh, "</body>\n</html>")?;
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env()) // RUST_LOG sets the level
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => PortalConfig::default(),
    };

    let mut state = config.initial_state();
    if let Some(index) = args.index {
        state = state.reduce(Action::SelectIndex(index));
    }
    if let Some(palette) = args.palette {
        state = state.reduce(Action::SetPalette(palette));
    }
    if args.reverse {
        state = state.reduce(Action::ToggleReverse);
    }
    for key in args.add {
        state = state.reduce(Action::AddLayer(key));
    }

    let style = build_style(&state, &config.bands)?;
    println!("{}", style.to_json()?);

    if let Some(path) = &args.html {
        let stops = state.color_stops()?;
        let comment = format!("{} over {}: {stops}", state.colormap.palette, state.index.label());
        write_html(path, &stops, &comment)?;
    }
    Ok(())
}
