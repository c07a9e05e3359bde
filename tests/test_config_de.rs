use anyhow::Result;
use spectral_ramp::{build_style, BandKey, ColormapName, PortalConfig, SpectralIndex};

#[test]
fn test_portal_config() -> Result<()> {
    let input = r#"
    PortalConfig(
        index: nbr,
        default_layer: WV,
        colormap: (
            palette: inferno,
            steps: 6,
            alpha: 0.5,
            brightness: 0.1,
        ),
        bands: {
            VIS: (url: "https://example.org/vis.tif", min: 0.0, max: 400.0),
            TIR1: (url: "https://example.org/tir1.tif", min: 200.0, max: 900.0),
        },
    )
    "#;
    let config = PortalConfig::from_ron_str(input)?;
    println!("{:#?}", config);
    assert_eq!(config.index, SpectralIndex::Nbr);
    assert_eq!(config.colormap.palette, ColormapName::Inferno);

    let state = config.initial_state();
    assert_eq!(state.layers.keys(), vec![BandKey::VIS, BandKey::TIR1]);
    let stops = state.color_stops()?;
    assert_eq!(stops.len(), 6);
    assert!(stops.iter().skip(1).take(4).all(|s| s.color.a == 0.5));

    // NBR reads VIS in slot 1 and TIR1 in slot 3
    let style = build_style(&state, &config.bands)?;
    let urls: Vec<&str> = style.sources.iter().map(|s| s.url.as_str()).collect();
    assert_eq!(urls, vec!["https://example.org/vis.tif",
                          "https://example.org/tir1.tif",
                          "https://example.org/tir1.tif"]);
    Ok(())
}
