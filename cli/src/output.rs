use authd_core::UsersResponse;
use colored::*;

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message);
}

/// Print the user list, marking the caller
pub fn print_users(response: &UsersResponse) {
    println!(
        "{} ({} registered)",
        "Users".cyan().bold(),
        response.users.len()
    );
    for user in &response.users {
        if user.username == response.me {
            println!("  {} {}", user.username.green().bold(), "(you)".dimmed());
        } else {
            println!("  {}", user.username);
        }
    }
}
