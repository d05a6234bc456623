//! Restaurant commands

use clap::{Args, Subcommand};
use pizzeria_core::{NewRestaurant, RestaurantId};
use pizzeria_http::PizzaHandler;

use crate::output::{format_json, format_list, OutputFormat};
use crate::{AppContext, Cli};

#[derive(Args)]
pub struct RestaurantArgs {
    #[command(subcommand)]
    pub command: RestaurantCommands,
}

#[derive(Subcommand)]
pub enum RestaurantCommands {
    /// Add a restaurant
    Add {
        /// Restaurant name
        name: String,
        /// Street address
        address: String,
    },
    /// List restaurants
    List,
    /// Show a restaurant with its pizzas
    Get {
        /// Restaurant id
        id: i64,
    },
    /// Delete a restaurant and its offerings
    Delete {
        /// Restaurant id
        id: i64,
    },
}

pub async fn run(args: &RestaurantArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let format = cli.output_format();
    let handler = PizzaHandler::new(ctx.storage.clone());

    match &args.command {
        RestaurantCommands::Add { name, address } => {
            let restaurant = ctx
                .storage
                .save_restaurant(&NewRestaurant::new(name, address))
                .await?;
            tracing::info!("Created restaurant {} ({})", restaurant.id, restaurant.name);

            match format {
                OutputFormat::Json => println!("{}", format_json(&restaurant)),
                OutputFormat::Table => {
                    println!("Created restaurant {}: {}", restaurant.id, restaurant.name)
                }
            }
        }
        RestaurantCommands::List => {
            let restaurants = handler.list_restaurants().await?;
            if restaurants.is_empty() && format == OutputFormat::Table {
                println!("No restaurants found");
            } else {
                println!("{}", format_list(&restaurants, format));
            }
        }
        RestaurantCommands::Get { id } => {
            let detail = handler.get_restaurant(RestaurantId(*id)).await?;

            match format {
                OutputFormat::Json => println!("{}", format_json(&detail)),
                OutputFormat::Table => {
                    println!("Restaurant {}: {}", detail.id, detail.name);
                    println!("  Address: {}", detail.address);
                    if detail.restaurant_pizzas.is_empty() {
                        println!("  No pizzas on offer");
                    } else {
                        println!();
                        println!("{}", format_list(&detail.restaurant_pizzas, format));
                    }
                }
            }
        }
        RestaurantCommands::Delete { id } => {
            handler.delete_restaurant(RestaurantId(*id)).await?;
            if !cli.quiet {
                println!("Deleted restaurant {}", id);
            }
        }
    }

    Ok(())
}
