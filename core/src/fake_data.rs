//! Deterministic fake-data vocabulary using curated word lists.
//!
//! Provides the Chilean-flavoured text fields of the generated schema
//! (cities, regions, addresses, company names, occupations, ...).
//! All generation is deterministic (same RNG seed = same values).

use crate::rng::TableRng;

/// Opaque service-point kind stored in table_c.
pub const SERVICE_POINT_KINDS: [&str; 3] = ["Type A", "Type B", "Type C"];

/// Opaque document kind stored in table_i.
pub const DOCUMENT_KINDS: [&str; 3] = ["Type X", "Type Y", "Type Z"];

/// Product names for table_j; a line item's product index is 1-based into this list.
pub const PRODUCTS: [&str; 5] = ["Product A", "Product B", "Product C", "Product D", "Product E"];

pub const PRICE_KINDS: [&str; 3] = ["Normal", "Discount", "Promotion"];

/// Deterministic fake-data generator over curated lists.
pub struct FakeData;

impl FakeData {
    pub fn city(rng: &mut TableRng) -> &'static str {
        Self::choose(rng, Self::cities())
    }

    pub fn region(rng: &mut TableRng) -> &'static str {
        Self::choose(rng, Self::regions())
    }

    pub fn word(rng: &mut TableRng) -> &'static str {
        Self::choose(rng, Self::words())
    }

    pub fn occupation(rng: &mut TableRng) -> &'static str {
        Self::choose(rng, Self::occupations())
    }

    pub fn company_suffix(rng: &mut TableRng) -> &'static str {
        Self::choose(rng, Self::company_suffixes())
    }

    /// Street name plus house number, e.g. "Avenida Los Leones 1432".
    pub fn street_address(rng: &mut TableRng) -> String {
        let street = Self::choose(rng, Self::streets());
        let number = rng.int_between(1, 9999);
        format!("{street} {number}")
    }

    /// Company name: "Surname Industry Suffix" or "Surname y Surname Suffix".
    pub fn company(rng: &mut TableRng) -> String {
        let first = Self::choose(rng, Self::surnames());
        let suffix = Self::company_suffix(rng);
        if rng.chance(0.5) {
            let industry = Self::choose(rng, Self::industries());
            format!("{first} {industry} {suffix}")
        } else {
            let second = Self::choose(rng, Self::surnames());
            format!("{first} y {second} {suffix}")
        }
    }

    /// A single ASCII letter, either case.
    pub fn letter(rng: &mut TableRng) -> String {
        const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
        let index = rng.next_u64_below(LETTERS.len() as u64) as usize;
        char::from(LETTERS[index]).to_string()
    }

    /// Latitude in [-90, 90], six decimals.
    pub fn latitude(rng: &mut TableRng) -> f64 {
        Self::round6(rng.uniform(-90.0, 90.0))
    }

    /// Longitude in [-180, 180], six decimals.
    pub fn longitude(rng: &mut TableRng) -> f64 {
        Self::round6(rng.uniform(-180.0, 180.0))
    }

    fn round6(v: f64) -> f64 {
        (v * 1e6).round() / 1e6
    }

    fn choose(rng: &mut TableRng, list: &'static [&'static str]) -> &'static str {
        let index = rng.next_u64_below(list.len() as u64) as usize;
        list[index]
    }

    fn regions() -> &'static [&'static str] {
        &[
            "Arica y Parinacota", "Tarapacá", "Antofagasta", "Atacama", "Coquimbo",
            "Valparaíso", "Metropolitana de Santiago", "Libertador General Bernardo O'Higgins",
            "Maule", "Ñuble", "Biobío", "La Araucanía", "Los Ríos", "Los Lagos",
            "Aysén del General Carlos Ibáñez del Campo", "Magallanes y de la Antártica Chilena",
        ]
    }

    fn cities() -> &'static [&'static str] {
        &[
            "Santiago", "Valparaíso", "Viña del Mar", "Concepción", "La Serena",
            "Antofagasta", "Temuco", "Rancagua", "Talca", "Arica", "Chillán",
            "Iquique", "Los Ángeles", "Puerto Montt", "Calama", "Coquimbo",
            "Osorno", "Valdivia", "Punta Arenas", "Copiapó", "Quilpué", "Curicó",
            "Ovalle", "San Antonio", "Linares", "Melipilla", "Coyhaique", "Angol",
        ]
    }

    fn streets() -> &'static [&'static str] {
        &[
            "Avenida Providencia", "Avenida Apoquindo", "Calle Los Leones", "Pasaje Las Rosas",
            "Avenida Libertador Bernardo O'Higgins", "Calle Merced", "Avenida Vicuña Mackenna",
            "Calle Huérfanos", "Avenida Grecia", "Calle San Martín", "Avenida Irarrázaval",
            "Camino Los Trapenses", "Calle Prat", "Avenida Brasil", "Calle Colón",
            "Avenida Pedro de Valdivia", "Pasaje Los Aromos", "Calle Freire",
        ]
    }

    fn words() -> &'static [&'static str] {
        &[
            "efectivo", "tarjeta", "cuenta", "cheque", "transferencia", "credito", "debito",
            "vale", "abono", "saldo", "ruta", "peaje", "estacion", "servicio", "camino",
            "flota", "motor", "carga", "viaje", "tramo", "norte", "sur", "centro",
            "rapido", "directo", "mensual", "anual", "prepago", "convenio", "contado",
        ]
    }

    fn occupations() -> &'static [&'static str] {
        &[
            "Ingeniero civil", "Contador auditor", "Abogado", "Profesor", "Enfermera",
            "Conductor", "Mecánico automotriz", "Administrador de empresas", "Arquitecto",
            "Técnico en logística", "Vendedor", "Médico cirujano", "Periodista",
            "Ingeniero comercial", "Electricista", "Diseñador gráfico", "Analista de sistemas",
            "Operador de maquinaria", "Químico farmacéutico", "Agricultor",
        ]
    }

    fn company_suffixes() -> &'static [&'static str] {
        &["S.A.", "Ltda.", "SpA", "EIRL", "Limitada", "S.A.C."]
    }

    fn surnames() -> &'static [&'static str] {
        &[
            "González", "Muñoz", "Rojas", "Díaz", "Pérez", "Soto", "Contreras", "Silva",
            "Martínez", "Sepúlveda", "Morales", "Rodríguez", "López", "Fuentes",
            "Hernández", "Torres", "Araya", "Flores", "Espinoza", "Valenzuela",
            "Castillo", "Tapia", "Reyes", "Gutiérrez", "Castro", "Pizarro", "Álvarez",
            "Vásquez", "Sánchez", "Fernández",
        ]
    }

    fn industries() -> &'static [&'static str] {
        &[
            "Transportes", "Logística", "Comercial", "Inversiones", "Servicios",
            "Distribuidora", "Constructora", "Agrícola", "Importadora", "Minera",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{rng::RngBank, types::Table};

    #[test]
    fn fake_data_is_deterministic() {
        let mut rng1 = RngBank::new(12345).for_table(Table::ServicePoints);
        let mut rng2 = RngBank::new(12345).for_table(Table::ServicePoints);

        let a = (FakeData::street_address(&mut rng1), FakeData::company(&mut rng1));
        let b = (FakeData::street_address(&mut rng2), FakeData::company(&mut rng2));

        assert_eq!(a, b, "Same seed should produce same values");
    }

    #[test]
    fn generates_valid_company_names() {
        let mut rng = RngBank::new(12345).for_table(Table::Vehicles);

        for _ in 0..50 {
            let name = FakeData::company(&mut rng);
            let parts: Vec<&str> = name.split_whitespace().collect();
            assert!(parts.len() >= 3, "Company name should have at least 3 parts: {}", name);
        }
    }

    #[test]
    fn coordinates_stay_on_the_globe() {
        let mut rng = RngBank::new(1).for_table(Table::ServicePoints);

        for _ in 0..200 {
            let lat = FakeData::latitude(&mut rng);
            let lon = FakeData::longitude(&mut rng);
            assert!((-90.0..=90.0).contains(&lat), "latitude {lat}");
            assert!((-180.0..=180.0).contains(&lon), "longitude {lon}");
        }
    }

    #[test]
    fn letter_is_single_ascii_alphabetic() {
        let mut rng = RngBank::new(5).for_table(Table::Vehicles);

        for _ in 0..100 {
            let l = FakeData::letter(&mut rng);
            assert_eq!(l.len(), 1);
            assert!(l.chars().all(|c| c.is_ascii_alphabetic()), "not a letter: {l}");
        }
    }
}
