//! Synonym tables per semantic role
//!
//! The same value has been stored under different keys over time
//! (`cidade`/`city`, `kmStart`/`km_start`/`km_inicio`, ...). Each role owns
//! its ordered alias list and is read through [`Role::lookup`].

use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Name,
    City,
    State,
    PostalCode,
    Neighborhood,
    Address,
    VehicleType,
    Category,
    Capacity,
    Weight,
    Size,
    Model,
    KmStart,
    KmEnd,
    Price,
}

impl Role {
    pub const fn synonyms(self) -> &'static [&'static str] {
        match self {
            Role::Name => &["nome", "name"],
            Role::City => &["cidade", "city", "nome_cidade", "municipio"],
            Role::State => &["estado", "state", "uf"],
            Role::PostalCode => &["cep", "postal_code", "zip"],
            Role::Neighborhood => &["bairro", "neighborhood"],
            Role::Address => &["endereco", "address", "logradouro"],
            Role::VehicleType => &["vehicleType", "vehicle_type", "tipo_veiculo", "tipo", "type"],
            Role::Category => &["categoria", "category"],
            Role::Capacity => &["capacidade", "capacity"],
            Role::Weight => &["peso", "weight"],
            Role::Size => &["tamanho", "size"],
            Role::Model => &["modelo", "model"],
            Role::KmStart => &["kmStart", "km_start", "km_inicio"],
            Role::KmEnd => &["kmEnd", "km_end", "km_fim"],
            Role::Price => &["price", "preco", "valor"],
        }
    }

    /// Label used in `"{Label}: {value}"` annotations
    pub const fn label(self) -> &'static str {
        match self {
            Role::Name => "Nome",
            Role::City => "Cidade",
            Role::State => "Estado",
            Role::PostalCode => "CEP",
            Role::Neighborhood => "Bairro",
            Role::Address => "Endereço",
            Role::VehicleType => "Veículo",
            Role::Category => "Categoria",
            Role::Capacity => "Capacidade",
            Role::Weight => "Peso",
            Role::Size => "Tamanho",
            Role::Model => "Modelo",
            Role::KmStart => "Km inicial",
            Role::KmEnd => "Km final",
            Role::Price => "Preço",
        }
    }

    /// First non-null value stored under any alias
    pub fn lookup(self, record: &Map<String, Value>) -> Option<&Value> {
        self.synonyms()
            .iter()
            .filter_map(|key| record.get(*key))
            .find(|value| !value.is_null())
    }

    /// First alias holding a non-empty string or a number, as text
    pub fn text(self, record: &Map<String, Value>) -> Option<String> {
        self.synonyms()
            .iter()
            .filter_map(|key| record.get(*key))
            .find_map(value_text)
    }

    /// First alias holding a number or a numeric string
    pub fn number(self, record: &Map<String, Value>) -> Option<f64> {
        self.synonyms()
            .iter()
            .filter_map(|key| record.get(*key))
            .find_map(value_number)
    }
}

/// Field order used when a caller has no specific table
pub const LABEL_PRIORITY: &[&str] = &[
    "nome", "name", "tipo", "type", "descricao", "description", "titulo", "title", "label",
    "cidade", "city", "valor", "value",
];

/// Destinations and stops
pub const LOCATION_PRIORITY: &[&str] = &[
    "cidade", "city", "nome_cidade", "municipio", "nome", "name", "endereco", "address",
];

/// Vehicle and body pickers
pub const SELECTION_PRIORITY: &[&str] = &[
    "nome", "name", "tipo", "type", "label", "descricao", "description",
];

/// Subtitle roles, in priority order
pub const SUBTITLE_ROLES: &[Role] = &[
    Role::Capacity,
    Role::Weight,
    Role::Size,
    Role::Category,
    Role::Model,
    Role::PostalCode,
    Role::Neighborhood,
    Role::Address,
];

/// Secondary lines shown under a destination or stop
pub const LOCATION_DETAIL_ROLES: &[Role] = &[Role::PostalCode, Role::Neighborhood, Role::Address];

/// Non-empty string (after trimming) or number, as display text
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Number, or a string holding one (`"1.250,50"` and `"1250.5"` both parse)
pub fn value_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_decimal(s),
        _ => None,
    }
}

fn parse_decimal(text: &str) -> Option<f64> {
    let trimmed = text
        .trim()
        .trim_start_matches("R$")
        .trim();
    if trimmed.is_empty() {
        return None;
    }
    // "1.250" is one thousand two hundred fifty, not 1.25
    let normalized = if is_thousands_grouped(trimmed) || trimmed.contains(',') {
        // pt-BR: thousands with '.', decimals with ','
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_string()
    };
    normalized
        .parse::<f64>()
        .ok()
        .or_else(|| trimmed.replace('.', "").parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

/// A lone '.' followed by exactly three digits
fn is_thousands_grouped(text: &str) -> bool {
    let Some((int_part, frac_part)) = text.split_once('.') else {
        return false;
    };
    let int_digits = int_part.strip_prefix('-').unwrap_or(int_part);
    !int_digits.is_empty()
        && int_digits.chars().all(|c| c.is_ascii_digit())
        && frac_part.len() == 3
        && frac_part.chars().all(|c| c.is_ascii_digit())
}
