//! Fixed sample data

use crate::model::NewPerson;

/// The person stored by `create_and_save_person`
pub fn sample_person() -> NewPerson {
    NewPerson::new("Juan Pérez")
        .age(30)
        .favorite_foods(["Pizza", "Tacos"])
}

/// Three-person batch used to seed the collection
pub fn sample_people() -> Vec<NewPerson> {
    vec![
        NewPerson::new("Carlos Pérez")
            .age(35)
            .favorite_foods(["Pasta", "Ensalada"]),
        NewPerson::new("Ana Gómez")
            .age(28)
            .favorite_foods(["Sushi", "Pizza"]),
        NewPerson::new("Luis Martínez")
            .age(40)
            .favorite_foods(["Hamburguesa", "Papitas"]),
    ]
}
