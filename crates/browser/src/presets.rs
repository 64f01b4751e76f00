//! Viewport preset catalog.
//!
//! Presets are either a mobile device (metrics, user agent and touch support
//! taken from the device descriptor) or a plain desktop viewport rendered at a
//! device scale factor of 1. The catalog is a static table; lookups never fail.

/// Name of the preset used when none (or an unknown one) is requested.
pub const DEFAULT_PRESET: &str = "fhd";

/// A mobile device to emulate.
#[derive(Debug, PartialEq)]
pub struct DeviceDescriptor {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
    pub device_scale_factor: f64,
    pub user_agent: &'static str,
    pub has_touch: bool,
    pub is_landscape: bool,
}

/// What a preset renders as.
#[derive(Debug, PartialEq)]
pub enum Viewport {
    Mobile(&'static DeviceDescriptor),
    Desktop { width: u32, height: u32 },
}

/// A named entry in the catalog.
#[derive(Debug, PartialEq)]
pub struct Preset {
    pub name: &'static str,
    pub viewport: Viewport,
}

impl Preset {
    pub fn is_mobile(&self) -> bool {
        matches!(self.viewport, Viewport::Mobile(_))
    }

    pub fn width(&self) -> u32 {
        match self.viewport {
            Viewport::Mobile(device) => device.width,
            Viewport::Desktop { width, .. } => width,
        }
    }

    pub fn height(&self) -> u32 {
        match self.viewport {
            Viewport::Mobile(device) => device.height,
            Viewport::Desktop { height, .. } => height,
        }
    }

    pub fn device_scale_factor(&self) -> f64 {
        match self.viewport {
            Viewport::Mobile(device) => device.device_scale_factor,
            Viewport::Desktop { .. } => 1.0,
        }
    }
}

static IPHONE_11: DeviceDescriptor = DeviceDescriptor {
    name: "iPhone 11",
    width: 414,
    height: 828,
    device_scale_factor: 2.0,
    user_agent: "Mozilla/5.0 (iPhone; CPU iPhone OS 13_7 like Mac OS X) AppleWebKit/605.1.15 \
                 (KHTML, like Gecko) Version/13.1 Mobile/15E148 Safari/604.1",
    has_touch: true,
    is_landscape: false,
};

static PIXEL_2: DeviceDescriptor = DeviceDescriptor {
    name: "Pixel 2",
    width: 411,
    height: 731,
    device_scale_factor: 2.625,
    user_agent: "Mozilla/5.0 (Linux; Android 8.0; Pixel 2 Build/OPD3.170816.012) \
                 AppleWebKit/537.36 (KHTML, like Gecko) Chrome/75.0.3765.0 Mobile Safari/537.36",
    has_touch: true,
    is_landscape: false,
};

static GALAXY_S9_PLUS: DeviceDescriptor = DeviceDescriptor {
    name: "Galaxy S9+",
    width: 320,
    height: 658,
    device_scale_factor: 4.5,
    user_agent: "Mozilla/5.0 (Linux; Android 8.0.0; SM-G965U Build/R16NW) \
                 AppleWebKit/537.36 (KHTML, like Gecko) Chrome/75.0.3765.0 Mobile Safari/537.36",
    has_touch: true,
    is_landscape: false,
};

static IPHONE_11_PRESET: Preset = Preset {
    name: "iphone11",
    viewport: Viewport::Mobile(&IPHONE_11),
};

static PIXEL_2_PRESET: Preset = Preset {
    name: "pixel2",
    viewport: Viewport::Mobile(&PIXEL_2),
};

static GALAXY_PRESET: Preset = Preset {
    name: "galaxy",
    viewport: Viewport::Mobile(&GALAXY_S9_PLUS),
};

static UHD_4K: Preset = Preset {
    name: "4k",
    viewport: Viewport::Desktop {
        width: 3840,
        height: 2160,
    },
};

static WQHD: Preset = Preset {
    name: "wqhd",
    viewport: Viewport::Desktop {
        width: 2560,
        height: 1440,
    },
};

static FULL_HD: Preset = Preset {
    name: DEFAULT_PRESET,
    viewport: Viewport::Desktop {
        width: 1920,
        height: 1080,
    },
};

/// The preset used when none (or an unknown one) is requested.
pub static DEFAULT: &Preset = &FULL_HD;

/// All presets, in the order `--all` captures them.
pub static PRESETS: &[&Preset] = &[
    &IPHONE_11_PRESET,
    &PIXEL_2_PRESET,
    &GALAXY_PRESET,
    &UHD_4K,
    &WQHD,
    &FULL_HD,
];

/// Look up a preset by name, falling back to [`DEFAULT`].
pub fn resolve(name: Option<&str>) -> &'static Preset {
    name.and_then(find).unwrap_or(DEFAULT)
}

/// Look up a preset by exact name.
pub fn find(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().copied().find(|p| p.name == name)
}

/// Preset names in catalog order.
pub fn names() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|p| p.name)
}
