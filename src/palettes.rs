// Indexed stops of the colormaps offered by the portal.  The
// Matplotlib maps are subsampled at nine positions.

use lazy_static::lazy_static;
pub(crate) mod ty;
use ty::*;

lazy_static! {
  pub(crate) static ref VIRIDIS: PaletteData = PaletteData {
    typ: PaletteType::Seq,
    stops: vec![
      stop(0.00,  68,   1,  84),
      stop(0.13,  71,  44, 122),
      stop(0.25,  59,  81, 139),
      stop(0.38,  44, 113, 142),
      stop(0.50,  33, 144, 141),
      stop(0.63,  39, 173, 129),
      stop(0.75,  92, 200,  99),
      stop(0.88, 170, 220,  50),
      stop(1.00, 253, 231,  37),
    ]};

  pub(crate) static ref PLASMA: PaletteData = PaletteData {
    typ: PaletteType::Seq,
    stops: vec![
      stop(0.00,  13,   8, 135),
      stop(0.13,  75,   3, 161),
      stop(0.25, 125,   3, 168),
      stop(0.38, 168,  34, 150),
      stop(0.50, 203,  70, 121),
      stop(0.63, 229, 107,  93),
      stop(0.75, 248, 148,  65),
      stop(0.88, 253, 195,  40),
      stop(1.00, 240, 249,  33),
    ]};

  pub(crate) static ref MAGMA: PaletteData = PaletteData {
    typ: PaletteType::Seq,
    stops: vec![
      stop(0.00,   0,   0,   4),
      stop(0.13,  28,  16,  68),
      stop(0.25,  79,  18, 123),
      stop(0.38, 129,  37, 129),
      stop(0.50, 181,  54, 122),
      stop(0.63, 229,  80, 100),
      stop(0.75, 251, 135,  97),
      stop(0.88, 254, 194, 135),
      stop(1.00, 252, 253, 191),
    ]};

  pub(crate) static ref INFERNO: PaletteData = PaletteData {
    typ: PaletteType::Seq,
    stops: vec![
      stop(0.00,   0,   0,   4),
      stop(0.13,  31,  12,  72),
      stop(0.25,  85,  15, 109),
      stop(0.38, 136,  34, 106),
      stop(0.50, 186,  54,  85),
      stop(0.63, 227,  89,  51),
      stop(0.75, 249, 140,  10),
      stop(0.88, 249, 201,  50),
      stop(1.00, 252, 255, 164),
    ]};

  pub(crate) static ref BONE: PaletteData = PaletteData {
    typ: PaletteType::Seq,
    stops: vec![
      stop(0.000,   0,   0,   0),
      stop(0.376,  84,  84, 116),
      stop(0.753, 169, 200, 200),
      stop(1.000, 255, 255, 255),
    ]};

  pub(crate) static ref JET: PaletteData = PaletteData {
    typ: PaletteType::Div,
    stops: vec![
      stop(0.000,   0,   0, 131),
      stop(0.125,   0,  60, 170),
      stop(0.375,   5, 255, 255),
      stop(0.625, 255, 255,   0),
      stop(0.875, 250,   0,   0),
      stop(1.000, 128,   0,   0),
    ]};

  pub(crate) static ref RAINBOW: PaletteData = PaletteData {
    typ: PaletteType::Div,
    stops: vec![
      stop(0.000, 150,   0,  90),
      stop(0.125,   0,   0, 200),
      stop(0.250,   0,  25, 255),
      stop(0.375,   0, 152, 255),
      stop(0.500,  44, 255, 150),
      stop(0.625, 151, 255,   0),
      stop(0.750, 255, 234,   0),
      stop(0.875, 255, 111,   0),
      stop(1.000, 255,   0,   0),
    ]};

  pub(crate) static ref PORTLAND: PaletteData = PaletteData {
    typ: PaletteType::Div,
    stops: vec![
      stop(0.00,  12,  51, 131),
      stop(0.25,  10, 136, 186),
      stop(0.50, 242, 211,  56),
      stop(0.75, 242, 143,  56),
      stop(1.00, 217,  30,  30),
    ]};
}

/// Returns the stop table of `name` (`None` has no table).
pub(crate) fn palette_data(name: ColormapName) -> Option<&'static PaletteData> {
    use ColormapName::*;
    let data: &'static PaletteData = match name {
        ColormapName::None => return Option::None,
        Viridis => &*VIRIDIS,
        Jet => &*JET,
        Rainbow => &*RAINBOW,
        Portland => &*PORTLAND,
        Bone => &*BONE,
        Plasma => &*PLASMA,
        Magma => &*MAGMA,
        Inferno => &*INFERNO,
    };
    Some(data)
}
