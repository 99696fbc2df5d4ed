//! Built-in recipe and grocery store catalog.

use rust_decimal_macros::dec;

use super::model::{DietaryRestriction, GroceryStore, Ingredient, Recipe};

fn steps(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| s.to_string()).collect()
}

/// The fixed recipe catalog.
pub fn builtin_recipes() -> Vec<Recipe> {
    use DietaryRestriction as D;

    vec![
        Recipe {
            id: "1".to_string(),
            title: "Grilled Chicken Salad with Avocado".to_string(),
            image: "https://images.unsplash.com/photo-1546793665-c74683f339c1".to_string(),
            description: "A protein-rich salad with grilled chicken breast, fresh greens, and creamy avocado.".to_string(),
            calories: 420,
            protein: 35,
            carbs: 15,
            fat: 25,
            prep_time: 15,
            cook_time: 15,
            dietary_tags: vec![D::None, D::GlutenFree, D::DairyFree],
            ingredients: vec![
                Ingredient::new("1-1", "Chicken breast", 200.0, "g"),
                Ingredient::new("1-2", "Mixed greens", 100.0, "g"),
                Ingredient::new("1-3", "Avocado", 1.0, "whole"),
                Ingredient::new("1-4", "Cherry tomatoes", 100.0, "g"),
                Ingredient::new("1-5", "Olive oil", 1.0, "tbsp"),
                Ingredient::new("1-6", "Lemon juice", 1.0, "tbsp"),
                Ingredient::new("1-7", "Salt", 0.5, "tsp"),
                Ingredient::new("1-8", "Black pepper", 0.25, "tsp"),
            ],
            instructions: steps(&[
                "Season chicken breast with salt and pepper.",
                "Grill chicken for 6-7 minutes per side until fully cooked.",
                "Wash and dry mixed greens and place in a large bowl.",
                "Slice avocado and cherry tomatoes.",
                "Slice grilled chicken into strips.",
                "Arrange chicken, avocado, and tomatoes over greens.",
                "Whisk together olive oil, lemon juice, salt, and pepper.",
                "Drizzle dressing over salad and serve.",
            ]),
        },
        Recipe {
            id: "2".to_string(),
            title: "Lentil and Vegetable Soup".to_string(),
            image: "https://images.unsplash.com/photo-1547592166-23ac45744acd".to_string(),
            description: "A hearty, plant-based soup filled with lentils and seasonal vegetables.".to_string(),
            calories: 320,
            protein: 18,
            carbs: 45,
            fat: 6,
            prep_time: 20,
            cook_time: 40,
            dietary_tags: vec![D::Vegetarian, D::Vegan, D::GlutenFree, D::DairyFree],
            ingredients: vec![
                Ingredient::new("2-1", "Green lentils", 200.0, "g"),
                Ingredient::new("2-2", "Onion", 1.0, "medium"),
                Ingredient::new("2-3", "Carrot", 2.0, "medium"),
                Ingredient::new("2-4", "Celery", 2.0, "stalks"),
                Ingredient::new("2-5", "Garlic", 2.0, "cloves"),
                Ingredient::new("2-6", "Vegetable broth", 1.5, "liters"),
                Ingredient::new("2-7", "Tomato", 2.0, "medium"),
                Ingredient::new("2-8", "Cumin", 1.0, "tsp"),
                Ingredient::new("2-9", "Olive oil", 1.0, "tbsp"),
                Ingredient::new("2-10", "Salt", 1.0, "tsp"),
                Ingredient::new("2-11", "Black pepper", 0.5, "tsp"),
            ],
            instructions: steps(&[
                "Dice onion, carrots, celery, and tomatoes. Mince garlic.",
                "Heat olive oil in a large pot over medium heat.",
                "Add onion, carrot, and celery. Cook until onion is translucent, about 5 minutes.",
                "Add garlic and cumin, cook for another minute until fragrant.",
                "Add lentils, vegetable broth, and tomatoes.",
                "Bring to a boil, then reduce heat and simmer for 35-40 minutes until lentils are tender.",
                "Season with salt and pepper to taste.",
                "Serve hot, optionally garnished with fresh herbs.",
            ]),
        },
        Recipe {
            id: "3".to_string(),
            title: "Protein-Packed Overnight Oats".to_string(),
            image: "https://images.unsplash.com/photo-1651476298221-cb56590bff34".to_string(),
            description: "A convenient make-ahead breakfast with oats, protein powder, and fresh fruit.".to_string(),
            calories: 380,
            protein: 25,
            carbs: 40,
            fat: 12,
            prep_time: 10,
            cook_time: 0,
            dietary_tags: vec![D::Vegetarian],
            ingredients: vec![
                Ingredient::new("3-1", "Rolled oats", 60.0, "g"),
                Ingredient::new("3-2", "Protein powder", 30.0, "g"),
                Ingredient::new("3-3", "Greek yogurt", 100.0, "g"),
                Ingredient::new("3-4", "Almond milk", 120.0, "ml"),
                Ingredient::new("3-5", "Chia seeds", 10.0, "g"),
                Ingredient::new("3-6", "Honey", 1.0, "tbsp"),
                Ingredient::new("3-7", "Blueberries", 50.0, "g"),
                Ingredient::new("3-8", "Sliced almonds", 15.0, "g"),
            ],
            instructions: steps(&[
                "In a jar or container, combine rolled oats, protein powder, and chia seeds.",
                "Add Greek yogurt, almond milk, and honey. Stir well to combine.",
                "Seal container and refrigerate overnight or for at least 4 hours.",
                "Before serving, top with fresh blueberries and sliced almonds.",
            ]),
        },
        Recipe {
            id: "4".to_string(),
            title: "Grilled Salmon with Asparagus".to_string(),
            image: "https://images.unsplash.com/photo-1467003909585-2f8a72700288".to_string(),
            description: "Omega-3 rich salmon fillet with grilled asparagus and lemon.".to_string(),
            calories: 460,
            protein: 40,
            carbs: 10,
            fat: 28,
            prep_time: 10,
            cook_time: 20,
            dietary_tags: vec![D::None, D::GlutenFree, D::DairyFree],
            ingredients: vec![
                Ingredient::new("4-1", "Salmon fillet", 200.0, "g"),
                Ingredient::new("4-2", "Asparagus", 200.0, "g"),
                Ingredient::new("4-3", "Olive oil", 2.0, "tbsp"),
                Ingredient::new("4-4", "Lemon", 1.0, "whole"),
                Ingredient::new("4-5", "Garlic powder", 0.5, "tsp"),
                Ingredient::new("4-6", "Salt", 0.5, "tsp"),
                Ingredient::new("4-7", "Black pepper", 0.25, "tsp"),
                Ingredient::new("4-8", "Fresh dill", 1.0, "tbsp"),
            ],
            instructions: steps(&[
                "Preheat grill to medium-high heat.",
                "Trim woody ends from asparagus and toss with 1 tbsp olive oil, salt, and pepper.",
                "Rub salmon with remaining olive oil, garlic powder, salt, and pepper.",
                "Slice half the lemon into rounds and the other half for juicing.",
                "Place salmon skin-side down on the grill. Arrange lemon slices on top.",
                "Grill for 10-12 minutes until salmon flakes easily with a fork.",
                "Grill asparagus for 5-7 minutes, turning occasionally.",
                "Plate salmon and asparagus, squeeze fresh lemon juice over both.",
                "Garnish with fresh dill and serve.",
            ]),
        },
    ]
}

/// The fixed grocery store list.
pub fn builtin_stores() -> Vec<GroceryStore> {
    vec![
        GroceryStore {
            id: "1".to_string(),
            name: "Walmart".to_string(),
            logo: "https://logo.clearbit.com/walmart.com".to_string(),
            delivery_fee: dec!(9.95),
            min_order: dec!(35),
            has_api: true,
        },
        GroceryStore {
            id: "2".to_string(),
            name: "Costco".to_string(),
            logo: "https://logo.clearbit.com/costco.com".to_string(),
            delivery_fee: dec!(11.99),
            min_order: dec!(40),
            has_api: true,
        },
        GroceryStore {
            id: "3".to_string(),
            name: "Save on Foods".to_string(),
            logo: "https://logo.clearbit.com/saveonfoods.com".to_string(),
            delivery_fee: dec!(7.95),
            min_order: dec!(30),
            has_api: true,
        },
    ]
}
