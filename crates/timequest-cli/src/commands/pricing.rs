use timequest_core::PLANS;

use super::CliResult;

pub fn run(json: bool) -> CliResult {
    if json {
        println!("{}", serde_json::to_string_pretty(&PLANS)?);
        return Ok(());
    }
    for plan in &PLANS {
        let badge = if plan.most_popular { "  (Most Popular)" } else { "" };
        println!("{} {} one-time{badge}", plan.name, plan.price_text());
        println!("  {}", plan.description);
        for feature in plan.features {
            println!("  * {feature}");
        }
        println!("  Checkout: {}", plan.checkout_url()?);
        println!();
    }
    Ok(())
}
