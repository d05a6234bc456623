//! Offer command: price a pizza at a restaurant

use clap::Args;
use pizzeria_core::CreateRestaurantPizzaRequest;
use pizzeria_http::PizzaHandler;

use crate::output::{format_json, format_list, OutputFormat};
use crate::{AppContext, Cli};

#[derive(Args)]
pub struct OfferArgs {
    /// Restaurant id
    pub restaurant_id: i64,
    /// Pizza id
    pub pizza_id: i64,
    /// Price, between 1 and 30
    #[arg(allow_negative_numbers = true)]
    pub price: i64,
}

/// Runs through the same checks as `POST /restaurant_pizzas`
pub async fn run(args: &OfferArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let handler = PizzaHandler::new(ctx.storage.clone());
    let request = CreateRestaurantPizzaRequest::new(args.price, args.pizza_id, args.restaurant_id);

    let detail = handler.create_restaurant_pizza(&request).await?;

    match cli.output_format() {
        OutputFormat::Json => println!("{}", format_json(&detail)),
        format => println!("{}", format_list(std::slice::from_ref(&detail), format)),
    }

    Ok(())
}
