//! Search queries used to seed a pool for each category.

use crate::model::Category;

const POP: &[&str] = &[
    "Aitana",
    "Manuel Carrasco",
    "Sebastian Yatra",
    "Morat",
    "Vanesa Martin",
    "Lola Indigo",
    "Rosalia",
    "Blackpink",
    "pop hits",
    "top pop songs",
];

const ROCK: &[&str] = &[
    "rock español",
    "spanish rock",
    "Heroes del Silencio",
    "Extremoduro",
    "Mago de Oz",
    "Heredeiros da Crus",
    "rock gallego",
    "alternative rock",
    "rock hits",
];

const INDIE: &[&str] = &[
    "indie español",
    "indie pop español",
    "Vetusta Morla",
    "Izal",
    "Love of Lesbian",
    "Arde Bogota",
    "Viva Suecia",
    "Siloe",
    "Sidonie",
    "Shinova",
    "Lori Meyers",
    "Miss Caffeina",
    "La La Love You",
    "Dakidarria",
];

const ELECTRONIC: &[&str] = &[
    "electronic dance",
    "house music",
    "Calvin Harris",
    "David Guetta",
    "Tiesto",
    "deep house",
    "edm hits",
    "dance hits",
];

const LATIN: &[&str] = &[
    "Bad Bunny",
    "Karol G",
    "QUEVEDO",
    "Myke Towers",
    "Manuel Turizo",
    "Ozuna",
    "Daddy Yankee",
    "reggaeton",
    "bachata",
    "latin pop",
];

const HITS: &[&str] = &[
    "top hits",
    "billboard hot 100",
    "trending music",
    "Bad Bunny",
    "Aitana",
    "Karol G",
    "Calvin Harris",
    "Blackpink",
];

/// Built-in queries for a category.
pub fn category_queries(category: Category) -> &'static [&'static str] {
    match category {
        Category::Pop => POP,
        Category::Rock => ROCK,
        Category::Indie => INDIE,
        Category::Electronic => ELECTRONIC,
        Category::Latin => LATIN,
        Category::Hits => HITS,
    }
}

/// Built-in queries followed by user-configured extras.
///
/// Blank extras and repeats are skipped; order is preserved.
pub fn queries_for(category: Category, extra: &[String]) -> Vec<String> {
    let mut queries: Vec<String> = Vec::new();
    let candidates = category_queries(category)
        .iter()
        .map(|q| q.to_string())
        .chain(extra.iter().map(|q| q.trim().to_string()));

    for query in candidates {
        if query.is_empty() {
            continue;
        }
        if queries.iter().any(|q| q.eq_ignore_ascii_case(&query)) {
            continue;
        }
        queries.push(query);
    }
    queries
}
