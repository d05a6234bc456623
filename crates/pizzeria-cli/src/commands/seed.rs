//! Seed command: load a small sample catalogue

use clap::Args;
use pizzeria_core::{NewPizza, NewRestaurant, NewRestaurantPizza, Price};

use crate::{AppContext, Cli};

const RESTAURANTS: &[(&str, &str)] = &[
    ("Karen's Pizza Shack", "address1"),
    ("Sanjay's Pizza", "address2"),
    ("Kiki's Pizza", "address3"),
];

const PIZZAS: &[(&str, &str)] = &[
    ("Emma", "Dough, Tomato Sauce, Cheese"),
    ("Geri", "Dough, Tomato Sauce, Cheese, Pepperoni"),
    ("Melanie", "Dough, Sauce, Ricotta, Red peppers, Mustard"),
];

/// (restaurant index, pizza index, price)
const OFFERINGS: &[(usize, usize, i64)] = &[(0, 0, 10), (0, 1, 12), (1, 2, 15), (2, 0, 8)];

#[derive(Args)]
pub struct SeedArgs {
    /// Delete all restaurants and pizzas first
    #[arg(long)]
    pub reset: bool,
}

pub async fn run(args: &SeedArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let storage = &ctx.storage;

    if args.reset {
        for restaurant in storage.get_all_restaurants().await? {
            storage.delete_restaurant(restaurant.id).await?;
        }
        for pizza in storage.get_all_pizzas().await? {
            storage.delete_pizza(pizza.id).await?;
        }
        tracing::info!("Cleared existing data");
    } else if !storage.get_all_restaurants().await?.is_empty()
        || !storage.get_all_pizzas().await?.is_empty()
    {
        if !cli.quiet {
            println!("Database already has data, skipping seed (use --reset to replace it)");
        }
        return Ok(());
    }

    let mut restaurants = Vec::with_capacity(RESTAURANTS.len());
    for (name, address) in RESTAURANTS {
        restaurants.push(storage.save_restaurant(&NewRestaurant::new(*name, *address)).await?);
    }

    let mut pizzas = Vec::with_capacity(PIZZAS.len());
    for (name, ingredients) in PIZZAS {
        pizzas.push(storage.save_pizza(&NewPizza::new(*name, *ingredients)).await?);
    }

    for &(r, p, price) in OFFERINGS {
        let offering = NewRestaurantPizza::new(Price::new(price)?, pizzas[p].id, restaurants[r].id);
        storage.create_restaurant_pizza(&offering).await?;
    }

    tracing::info!(
        "Seeded {} restaurants, {} pizzas, {} offerings",
        restaurants.len(),
        pizzas.len(),
        OFFERINGS.len()
    );
    if !cli.quiet {
        println!(
            "Seeded {} restaurants, {} pizzas and {} offerings",
            restaurants.len(),
            pizzas.len(),
            OFFERINGS.len()
        );
    }

    Ok(())
}
