/// Visual treatment of a marker overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    Default,
    Selected,
    /// Unsaved point waiting for save or cancel
    Pending,
}

/// Concrete look the engine renders for a style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerAppearance {
    pub style: MarkerStyle,
    /// Dot diameter in CSS pixels before `scale`
    pub size: u32,
    pub scale: f32,
    pub fill: &'static str,
    pub border: &'static str,
    /// Outer halo ring, if any
    pub halo: Option<&'static str>,
    pub z_index: i32,
    pub pulse: bool,
    /// Anchor offset so the dot centers on its coordinate
    pub offset: (i32, i32),
}

const DOT_SIZE: u32 = 12;
const DOT_OFFSET: (i32, i32) = (-6, -6);

impl MarkerStyle {
    pub fn appearance(self) -> MarkerAppearance {
        match self {
            MarkerStyle::Default => MarkerAppearance {
                style: self,
                size: DOT_SIZE,
                scale: 1.0,
                fill: "#000000",
                border: "#ffffff",
                halo: None,
                z_index: 10,
                pulse: false,
                offset: DOT_OFFSET,
            },
            MarkerStyle::Selected => MarkerAppearance {
                style: self,
                size: DOT_SIZE,
                scale: 1.5,
                fill: "#ffffff",
                border: "#000000",
                halo: Some("rgba(255,255,255,0.2)"),
                z_index: 20,
                pulse: false,
                offset: DOT_OFFSET,
            },
            MarkerStyle::Pending => MarkerAppearance {
                style: self,
                size: DOT_SIZE,
                scale: 1.0,
                fill: "#3b82f6",
                border: "#ffffff",
                halo: Some("rgba(59,130,246,0.3)"),
                z_index: 100,
                pulse: true,
                offset: DOT_OFFSET,
            },
        }
    }
}
