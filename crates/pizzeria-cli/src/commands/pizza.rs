//! Pizza commands

use clap::{Args, Subcommand};
use pizzeria_core::{NewPizza, PizzaId};

use crate::output::{format_json, format_list, OutputFormat};
use crate::{AppContext, Cli};

#[derive(Args)]
pub struct PizzaArgs {
    #[command(subcommand)]
    pub command: PizzaCommands,
}

#[derive(Subcommand)]
pub enum PizzaCommands {
    /// Add a pizza
    Add {
        /// Pizza name
        name: String,
        /// Comma separated ingredients
        ingredients: String,
    },
    /// List pizzas
    List,
    /// Delete a pizza and every offering of it
    Delete {
        /// Pizza id
        id: i64,
    },
}

pub async fn run(args: &PizzaArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let format = cli.output_format();

    match &args.command {
        PizzaCommands::Add { name, ingredients } => {
            let pizza = ctx
                .storage
                .save_pizza(&NewPizza::new(name, ingredients))
                .await?;
            tracing::info!("Created pizza {} ({})", pizza.id, pizza.name);

            match format {
                OutputFormat::Json => println!("{}", format_json(&pizza)),
                OutputFormat::Table => println!("Created pizza {}: {}", pizza.id, pizza.name),
            }
        }
        PizzaCommands::List => {
            let pizzas = ctx.storage.get_all_pizzas().await?;
            if pizzas.is_empty() && format == OutputFormat::Table {
                println!("No pizzas found");
            } else {
                println!("{}", format_list(&pizzas, format));
            }
        }
        PizzaCommands::Delete { id } => {
            if !ctx.storage.delete_pizza(PizzaId(*id)).await? {
                anyhow::bail!("Pizza not found");
            }
            tracing::info!("Deleted pizza {}", id);
            if !cli.quiet {
                println!("Deleted pizza {}", id);
            }
        }
    }

    Ok(())
}
