// Barangays of Iligan City, in the order used for geographic breakdowns.
pub const BARANGAYS: [&str; 44] = [
    "Abuno",
    "Acmac",
    "Bagong Silang",
    "Bonbonon",
    "Bunawan",
    "Buru-un",
    "Dalipuga",
    "Del Carmen",
    "Digkilaan",
    "Ditucalan",
    "Dulag",
    "Hinaplanon",
    "Hindang",
    "Kabacsanan",
    "Kalilangan",
    "Kiwalan",
    "Lanipao",
    "Luinab",
    "Mahayhay",
    "Mainit",
    "Mandulog",
    "Maria Cristina",
    "Palao",
    "Panoroganan",
    "Poblacion",
    "Puga-an",
    "Rogongon",
    "San Miguel",
    "San Roque",
    "Santa Elena",
    "Santa Filomena",
    "Santiago",
    "Santo Rosario",
    "Saray-Tibanga",
    "Suarez",
    "Tambacan",
    "Tibanga",
    "Tipanoy",
    "Tominobo Proper",
    "Tominobo Upper",
    "Tubod",
    "Ubaldo Laya",
    "Upper Hinaplanon",
    "Villa Verde",
];

pub fn index_of(name: &str) -> Option<usize> {
    BARANGAYS.iter().position(|b| *b == name)
}

pub fn is_known(name: &str) -> bool {
    index_of(name).is_some()
}
