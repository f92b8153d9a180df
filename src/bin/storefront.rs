use anyhow::Context;
use clap::{Parser, Subcommand};
use log::debug;
use storefront_client::catalog::{Category, Product};
use storefront_client::config::ClientOptions;
use storefront_client::orders::{Order, ShippingAddress};
use storefront_client::ui::{AuthForm, NoticeLevel, Notifications};
use storefront_client::Storefront;

#[derive(Parser, Debug)]
#[clap(name = "storefront", version)]
#[clap(about = "Browse the storefront, manage your cart and place orders", long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    /// Backend base URL. Defaults to STOREFRONT_API_URL.
    #[clap(long)]
    api_url: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List products
    Products {
        /// Only show this category (extensions, wigs, bundles, closures, hair_care, accessories)
        #[clap(long)]
        category: Option<Category>,
    },
    /// Show one product
    Product { id: String },
    /// Load the backend's sample products
    Seed,
    /// Create an account
    Register {
        email: String,
        password: String,
        first_name: String,
        last_name: String,
    },
    /// Sign in and remember the session
    Login { email: String, password: String },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Show the cart
    Cart,
    /// Add a product to the cart
    Add {
        product_id: String,
        #[clap(long, default_value = "1")]
        quantity: u32,
    },
    /// Remove a product from the cart
    Remove { product_id: String },
    /// Order everything in the cart
    Checkout {
        #[clap(long)]
        name: String,
        #[clap(long)]
        street: String,
        #[clap(long)]
        city: String,
        #[clap(long)]
        state: Option<String>,
        #[clap(long)]
        postal_code: String,
        #[clap(long)]
        country: String,
        #[clap(long, default_value = "card")]
        payment: String,
    },
    /// List your orders
    Orders,
    /// Show one order
    Order { id: String },
}

fn print_product(product: &Product) {
    println!(
        "{:<38} {:<12} {:>9.2}  {}{}",
        product.id,
        product.category.label(),
        product.price,
        product.name,
        if product.in_stock() { "" } else { " (out of stock)" }
    );
}

fn print_order(order: &Order) {
    println!(
        "{}  {:<10} {:>9.2}  {} item(s)",
        order.id,
        order.status,
        order.total_amount,
        order.items.len()
    );
}

fn flush(notifications: &Notifications) {
    for notice in notifications.drain() {
        match notice.level {
            NoticeLevel::Error => eprintln!("error: {notice}"),
            _ => println!("{notice}"),
        }
    }
}

async fn print_cart(shop: &Storefront, refresh: bool) -> anyhow::Result<()> {
    let mut products = shop.catalog_view();
    products.reload().await;

    let mut panel = shop.cart_panel();
    panel.remember_products(products.products());
    if refresh && !panel.refresh().await {
        return Ok(());
    }

    if panel.is_empty() {
        println!("Your cart is empty");
        return Ok(());
    }
    for line in panel.lines() {
        println!(
            "{:>3} x {:<40} {:>9.2} {:>10.2}",
            line.quantity,
            line.title(),
            line.price,
            line.subtotal
        );
    }
    println!("{:>66}", format!("Total: {}", panel.footer_total()));
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    pretty_env_logger::init();
    let cli = Cli::parse();

    let mut options = ClientOptions::from_env()?;
    if let Some(url) = &cli.api_url {
        options = options.with_base_url(url);
    }
    debug!("using {}", options.base_url);

    let shop = Storefront::new_with_options(options).context("failed to build client")?;
    let notifications = shop.notifications().clone();

    if let Some(user) = shop.start().await {
        debug!("signed in as {}", user.email);
    }

    match cli.command {
        Commands::Products { category } => {
            let mut view = shop.catalog_view().with_filter(category);
            view.mount().await;
            for product in view.products() {
                print_product(product);
            }
        }
        Commands::Product { id } => match shop.catalog().get(&id).await {
            Ok(product) => {
                print_product(&product);
                println!("\n{}", product.description);
                for name in product.attributes.keys() {
                    if let Some(value) = product.attribute(name) {
                        println!("  {name}: {value}");
                    }
                }
            }
            Err(err) => notifications.report(&err),
        },
        Commands::Seed => match shop.catalog().seed().await {
            Ok(message) => println!("{message}"),
            Err(err) => notifications.report(&err),
        },
        Commands::Register {
            email,
            password,
            first_name,
            last_name,
        } => {
            let mut panel = shop.auth_panel();
            panel.toggle_mode();
            *panel.form_mut() = AuthForm {
                email,
                password,
                first_name,
                last_name,
            };
            panel.submit().await;
        }
        Commands::Login { email, password } => {
            let mut panel = shop.auth_panel();
            panel.form_mut().email = email;
            panel.form_mut().password = password;
            panel.submit().await;
        }
        Commands::Logout => shop.auth_panel().logout(),
        Commands::Whoami => match shop.session().current_user() {
            Some(user) => println!("{} <{}>", user.full_name(), user.email),
            None => println!("Not signed in"),
        },
        Commands::Cart => print_cart(&shop, true).await?,
        Commands::Add {
            product_id,
            quantity,
        } => {
            if shop.cart_panel().add(&product_id, quantity).await {
                print_cart(&shop, false).await?;
            }
        }
        Commands::Remove { product_id } => {
            if shop.cart_panel().remove(&product_id).await {
                print_cart(&shop, false).await?;
            }
        }
        Commands::Checkout {
            name,
            street,
            city,
            state,
            postal_code,
            country,
            payment,
        } => {
            let address = ShippingAddress {
                full_name: name,
                street,
                city,
                state,
                postal_code,
                country,
            };
            let mut panel = shop.cart_panel();
            if panel.refresh().await {
                if let Some(order) = panel.checkout(address, &payment).await {
                    print_order(&order);
                }
            }
        }
        Commands::Orders => match shop.orders().list().await {
            Ok(orders) if orders.is_empty() => println!("No orders yet"),
            Ok(orders) => orders.iter().for_each(print_order),
            Err(err) => notifications.report(&err),
        },
        Commands::Order { id } => match shop.orders().get(&id).await {
            Ok(order) => {
                print_order(&order);
                for item in &order.items {
                    println!("  {:>3} x {} @ {:.2}", item.quantity, item.product_id, item.price);
                }
            }
            Err(err) => notifications.report(&err),
        },
    }

    flush(&notifications);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}
