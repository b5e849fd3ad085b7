//! Unit catalog: every category, its ordered unit labels and its conversion rule
//!
//! Built once on first use and never mutated. Unit order is display order.

use std::f64::consts::PI;

use once_cell::sync::Lazy;

use super::rules::{
    AngleRule, AngleUnit, BaseRateRule, ConversionRule, LinearRule, SoundIntensityRule, SoundUnit,
    TemperatureRule, TemperatureScale, REFERENCE_INTENSITY,
};

/// Unit categories for type-safe conversions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Length,
    Mass,
    Time,
    Temperature,
    Area,
    Volume,
    Speed,
    Angle,
    SoundIntensity,
    Power,
    Pressure,
    Data,
    Frequency,
    Rpm,
    FirearmRof,
}

/// Which converter panel a category belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryGroup {
    Main,
    Misc,
}

impl CategoryGroup {
    pub fn as_str(self) -> &'static str {
        match self {
            CategoryGroup::Main => "main",
            CategoryGroup::Misc => "misc",
        }
    }
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 15] = [
        Category::Length,
        Category::Mass,
        Category::Time,
        Category::Temperature,
        Category::Area,
        Category::Volume,
        Category::Speed,
        Category::Angle,
        Category::SoundIntensity,
        Category::Power,
        Category::Pressure,
        Category::Data,
        Category::Frequency,
        Category::Rpm,
        Category::FirearmRof,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Length => "Length",
            Category::Mass => "Mass",
            Category::Time => "Time",
            Category::Temperature => "Temperature",
            Category::Area => "Area",
            Category::Volume => "Volume",
            Category::Speed => "Speed",
            Category::Angle => "Angle",
            Category::SoundIntensity => "Sound Intensity",
            Category::Power => "Power",
            Category::Pressure => "Pressure",
            Category::Data => "Data",
            Category::Frequency => "Frequency",
            Category::Rpm => "RPM",
            Category::FirearmRof => "Firearm ROF",
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Category::Length => "length",
            Category::Mass => "mass",
            Category::Time => "time",
            Category::Temperature => "temperature",
            Category::Area => "area",
            Category::Volume => "volume",
            Category::Speed => "speed",
            Category::Angle => "angle",
            Category::SoundIntensity => "sound_intensity",
            Category::Power => "power",
            Category::Pressure => "pressure",
            Category::Data => "data",
            Category::Frequency => "frequency",
            Category::Rpm => "rpm",
            Category::FirearmRof => "firearm_rof",
        }
    }

    pub fn group(self) -> CategoryGroup {
        match self {
            Category::Length
            | Category::Mass
            | Category::Time
            | Category::Temperature
            | Category::Area
            | Category::Volume
            | Category::Speed => CategoryGroup::Main,
            _ => CategoryGroup::Misc,
        }
    }

    /// Case-insensitive lookup by display name or id
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("Firearm Rate-of-Fire") {
            return Some(Category::FirearmRof);
        }
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name) || c.id().eq_ignore_ascii_case(name))
    }

    pub fn definition(self) -> &'static CategoryDefinition {
        &CATALOG[self as usize]
    }

    pub fn units(self) -> &'static [&'static str] {
        &self.definition().units
    }

    pub fn rule(self) -> &'static ConversionRule {
        &self.definition().rule
    }

    pub fn unit_label(self, index: usize) -> Option<&'static str> {
        self.units().get(index).copied()
    }

    /// Resolve a unit by exact label, then by symbol, then case-insensitively by label.
    ///
    /// Symbols only resolve when unique within the category, so `"US"` (shared by
    /// several volume units) never matches.
    pub fn unit_index(self, query: &str) -> Option<usize> {
        let query = query.trim();
        let units = self.units();

        if let Some(index) = units.iter().position(|u| *u == query) {
            return Some(index);
        }

        let mut by_symbol = units
            .iter()
            .enumerate()
            .filter(|(_, u)| unit_symbol(u) == Some(query))
            .map(|(i, _)| i);
        if let (Some(index), None) = (by_symbol.next(), by_symbol.next()) {
            return Some(index);
        }

        units.iter().position(|u| u.to_lowercase() == query.to_lowercase())
    }
}

/// Text between the trailing parentheses of a label, e.g. `"km"` for `"kilometer (km)"`
pub fn unit_symbol(label: &str) -> Option<&str> {
    let inner = label.strip_suffix(')')?;
    let open = inner.rfind('(')?;
    Some(&inner[open + 1..])
}

/// Find the first category (display order) that knows `query`
pub fn find_unit(query: &str) -> Option<(Category, usize)> {
    Category::ALL
        .into_iter()
        .find_map(|category| category.unit_index(query).map(|index| (category, index)))
}

pub fn categories() -> &'static [Category] {
    &Category::ALL
}

/// Static registration of one category
#[derive(Debug)]
pub struct CategoryDefinition {
    pub category: Category,
    pub units: Vec<&'static str>,
    pub rule: ConversionRule,
}

fn linear(category: Category, table: &[(&'static str, f64)]) -> CategoryDefinition {
    let (units, factors) = table.iter().copied().unzip();
    CategoryDefinition {
        category,
        units,
        rule: LinearRule { factors }.into(),
    }
}

fn base_rate(category: Category, table: &[(&'static str, f64, f64)]) -> CategoryDefinition {
    let units = table.iter().map(|(label, _, _)| *label).collect();
    let pairs: Vec<(f64, f64)> = table.iter().map(|(_, to, from)| (*to, *from)).collect();
    CategoryDefinition {
        category,
        units,
        rule: BaseRateRule::new(&pairs).into(),
    }
}

fn data_table() -> Vec<(&'static str, f64)> {
    let k: f64 = 1000.0;
    let ki: f64 = 1024.0;
    vec![
        ("bit (b)", 1.0),
        ("byte (B)", 8.0),
        // Decimal (SI)
        ("kilobit (kb)", k),
        ("kilobyte (kB)", 8.0 * k),
        ("megabit (Mb)", k.powi(2)),
        ("megabyte (MB)", 8.0 * k.powi(2)),
        ("gigabit (Gb)", k.powi(3)),
        ("gigabyte (GB)", 8.0 * k.powi(3)),
        ("terabit (Tb)", k.powi(4)),
        ("terabyte (TB)", 8.0 * k.powi(4)),
        // Binary (IEC)
        ("kibibit (Kib)", ki),
        ("kibibyte (KiB)", 8.0 * ki),
        ("mebibit (Mib)", ki.powi(2)),
        ("mebibyte (MiB)", 8.0 * ki.powi(2)),
        ("gibibit (Gib)", ki.powi(3)),
        ("gibibyte (GiB)", 8.0 * ki.powi(3)),
        ("tebibit (Tib)", ki.powi(4)),
        ("tebibyte (TiB)", 8.0 * ki.powi(4)),
    ]
}

/// Thread-safe catalog, indexed by `Category as usize`
static CATALOG: Lazy<Vec<CategoryDefinition>> = Lazy::new(|| {
    let radians_per_second = 60.0 / (2.0 * PI);

    vec![
        // Base: meter
        linear(Category::Length, &[
            ("meter (m)", 1.0),
            ("kilometer (km)", 1000.0),
            ("centimeter (cm)", 0.01),
            ("millimeter (mm)", 0.001),
            ("inch (in)", 0.0254),
            ("foot (ft)", 0.3048),
            ("yard (yd)", 0.9144),
            ("mile (mi)", 1609.344),
        ]),
        // Base: kilogram
        linear(Category::Mass, &[
            ("kilogram (kg)", 1.0),
            ("gram (g)", 0.001),
            ("milligram (mg)", 1e-6),
            ("metric ton (t)", 1000.0),
            ("ounce (oz)", 0.028349523125),
            ("pound (lb)", 0.45359237),
            ("stone", 6.35029318),
        ]),
        // Base: second. A year is 365 days.
        linear(Category::Time, &[
            ("second (s)", 1.0),
            ("minute (min)", 60.0),
            ("hour (h)", 3600.0),
            ("day", 86400.0),
            ("week", 604800.0),
            ("year", 31536000.0),
        ]),
        CategoryDefinition {
            category: Category::Temperature,
            units: vec!["kelvin (K)", "Celsius (°C)", "Fahrenheit (°F)"],
            rule: TemperatureRule {
                scales: vec![TemperatureScale::Kelvin, TemperatureScale::Celsius, TemperatureScale::Fahrenheit],
            }
            .into(),
        },
        // Base: square meter
        linear(Category::Area, &[
            ("square meter (m²)", 1.0),
            ("hectare (ha)", 10_000.0),
            ("acre", 4046.8564224),
            ("square kilometer (km²)", 1_000_000.0),
            ("square foot (ft²)", 0.09290304),
            ("square inch (in²)", 0.00064516),
        ]),
        // Base: cubic meter
        linear(Category::Volume, &[
            ("cubic meter (m³)", 1.0),
            ("liter (L)", 0.001),
            ("milliliter (mL)", 1e-6),
            ("gallon (US)", 0.003785411784),
            ("gallon (UK)", 0.00454609),
            ("pint (US)", 0.000473176473),
            ("quart (US)", 0.000946352946),
            ("cubic foot (ft³)", 0.028316846592),
            ("cubic inch (in³)", 0.000016387064),
        ]),
        // Base: meter per second
        linear(Category::Speed, &[
            ("meter per second (m/s)", 1.0),
            ("kilometer per hour (km/h)", 1000.0 / 3600.0),
            ("mile per hour (mph)", 1609.344 / 3600.0),
            ("foot per second (ft/s)", 0.3048),
            ("knot (kn)", 1852.0 / 3600.0),
        ]),
        CategoryDefinition {
            category: Category::Angle,
            units: vec!["degree (°)", "radian (rad)"],
            rule: AngleRule { units: vec![AngleUnit::Degree, AngleUnit::Radian] }.into(),
        },
        CategoryDefinition {
            category: Category::SoundIntensity,
            units: vec!["intensity (W/m²)", "level (dB)"],
            rule: SoundIntensityRule {
                units: vec![SoundUnit::Intensity, SoundUnit::Level],
                reference: REFERENCE_INTENSITY,
            }
            .into(),
        },
        // Base: watt. Mechanical horsepower.
        linear(Category::Power, &[
            ("watt (W)", 1.0),
            ("kilowatt (kW)", 1000.0),
            ("megawatt (MW)", 1_000_000.0),
            ("horsepower (hp)", 745.6998715822702),
        ]),
        // Base: pascal. 1 atm = 760 Torr.
        linear(Category::Pressure, &[
            ("pascal (Pa)", 1.0),
            ("kilopascal (kPa)", 1_000.0),
            ("bar", 100_000.0),
            ("atmosphere (atm)", 101_325.0),
            ("torr (Torr)", 101_325.0 / 760.0),
            ("pound per square inch (psi)", 6_894.757293168361),
        ]),
        // Base: bit
        linear(Category::Data, &data_table()),
        // Base: hertz
        linear(Category::Frequency, &[
            ("hertz (Hz)", 1.0),
            ("kilohertz (kHz)", 1e3),
            ("megahertz (MHz)", 1e6),
            ("gigahertz (GHz)", 1e9),
            ("terahertz (THz)", 1e12),
        ]),
        // Base: RPM, (to_base, from_base)
        base_rate(Category::Rpm, &[
            ("revolutions per minute (RPM)", 1.0, 1.0),
            ("revolutions per second (RPS)", 1.0 / 60.0, 60.0),
            ("hertz (Hz)", 1.0 / 60.0, 60.0),
            ("radians per second (rad/s)", 1.0 / radians_per_second, radians_per_second),
        ]),
        // Base: rounds per minute, (to_base, from_base)
        base_rate(Category::FirearmRof, &[
            ("rounds per minute (RPM)", 1.0, 1.0),
            ("rounds per second (RPS)", 1.0 / 60.0, 60.0),
            ("rounds per hour (RPH)", 1.0 / 60.0, 60.0),
        ]),
    ]
});
