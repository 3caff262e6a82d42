//! Built-in forms for the site's collections

use once_cell::sync::Lazy;
use std::collections::BTreeMap;

use super::{FieldDescriptor as Field, FieldKind::*, FormSchema};
use crate::content::document::{
    ABOUT, CONTACT, CONTACTS, FOOTER, HERO, NAVIGATION, PROJECTS, SERVICES, SITE_CONFIG,
};

/// Icons the project form offers
pub const PROJECT_ICONS: &[&str] = &["Home", "Users", "Heart", "Truck", "CreditCard"];

static SCHEMAS: Lazy<BTreeMap<&'static str, FormSchema>> = Lazy::new(|| {
    BTreeMap::from([
        (NAVIGATION, navigation()),
        (HERO, hero()),
        (SERVICES, services()),
        (ABOUT, about()),
        (PROJECTS, projects()),
        (CONTACT, contact()),
        (FOOTER, footer()),
        (SITE_CONFIG, site_config()),
        (CONTACTS, inquiry()),
    ])
});

/// Form for a collection, if it has one
pub fn schema_for(collection: &str) -> Option<&'static FormSchema> {
    SCHEMAS.get(collection)
}

/// Collections with a built-in form
pub fn form_names() -> Vec<&'static str> {
    SCHEMAS.keys().copied().collect()
}

fn navigation() -> FormSchema {
    FormSchema::new(vec![
        Field::new("title", "Title", Text).placeholder("Home").required(),
        Field::new("href", "Link", Text).placeholder("#home").required(),
    ])
}

fn hero() -> FormSchema {
    FormSchema::new(vec![
        Field::new("title", "Title", Text).placeholder("Main Headline").required(),
        Field::new("subtitle", "Subtitle", Textarea)
            .placeholder("Supporting text for the headline")
            .required(),
        Field::new("buttonText", "Button Text", Text).placeholder("Get Started").required(),
        Field::new("buttonLink", "Button Link", Text).placeholder("#services").required(),
    ])
}

fn services() -> FormSchema {
    FormSchema::new(vec![
        Field::new("icon", "Icon", Text)
            .placeholder("Code")
            .description("Icon name from Lucide icons")
            .required(),
        Field::new("title", "Title", Text).placeholder("Service Title").required(),
        Field::new("description", "Description", Textarea)
            .placeholder("Service description")
            .required(),
        Field::new("gradient", "Gradient", Text)
            .placeholder("from-blue-600 to-purple-600")
            .description("Tailwind gradient classes")
            .required(),
        Field::new("hoverGradient", "Hover Gradient", Text)
            .placeholder("from-blue-700 to-purple-700")
            .description("Tailwind gradient classes on hover")
            .required(),
    ])
}

fn about() -> FormSchema {
    let stat = FormSchema::new(vec![
        Field::new("value", "Value", Text).placeholder("50+").required(),
        Field::new("label", "Label", Text).placeholder("Projects Completed").required(),
    ]);
    let feature = FormSchema::new(vec![
        Field::new("title", "Title", Text).placeholder("Feature Title").required(),
        Field::new("description", "Description", Textarea)
            .placeholder("Feature description...")
            .required(),
    ]);

    FormSchema::new(vec![
        Field::new("title", "Title", Text).placeholder("About Us").required(),
        Field::new("subtitle", "Subtitle", Text).placeholder("Our Mission").required(),
        Field::new("description", "Description", Textarea)
            .placeholder("Detailed description about your company...")
            .required(),
    ])
    .with_sub_form("stats", stat)
    .with_sub_form("features", feature)
}

fn projects() -> FormSchema {
    FormSchema::new(vec![
        Field::new("title", "Project Title", Text)
            .placeholder("Enter project title")
            .required(),
        Field::new("description", "Description", Textarea)
            .placeholder("Project description")
            .required(),
        Field::new("iconName", "Icon", Select)
            .placeholder("Select an icon")
            .options(PROJECT_ICONS)
            .required(),
        Field::new("imageUrl", "Image URL", Text).placeholder("/uploads/your-image.jpg"),
        Field::new("tags", "Tags (comma separated)", Text)
            .placeholder("Web Development, AI, Database")
            .description("Enter tags separated by commas"),
        Field::new("link", "Project Link", Text)
            .placeholder("https://...")
            .description("URL to the project (live demo or repository)"),
        Field::new("demoLink", "Demo Link", Url).placeholder("https://demo.example.com"),
        Field::new("githubLink", "GitHub Link", Url).placeholder("https://github.com/..."),
    ])
}

fn contact() -> FormSchema {
    FormSchema::new(vec![
        Field::new("title", "Title", Text).placeholder("Get in Touch").required(),
        Field::new("subtitle", "Subtitle", Text)
            .placeholder("We'd love to hear from you")
            .required(),
        Field::new("email", "Email", Email).placeholder("contact@example.com").required(),
        Field::new("phone", "Phone", Text).placeholder("+1 (555) 123-4567").required(),
        Field::new("address", "Address", Textarea)
            .placeholder("123 Main St, City, State, ZIP")
            .required(),
    ])
}

fn footer() -> FormSchema {
    let social_link = FormSchema::new(vec![
        Field::new("platform", "Platform", Text)
            .placeholder("Twitter, Facebook, LinkedIn, etc.")
            .required(),
        Field::new("url", "URL", Url)
            .placeholder("https://twitter.com/yourusername")
            .required(),
        Field::new("icon", "Icon Name", Text)
            .placeholder("Twitter, Github, Linkedin, etc.")
            .description("Icon name from Lucide icons")
            .required(),
    ]);

    FormSchema::new(vec![
        Field::new("companyName", "Company Name", Text)
            .placeholder("Your Company Name")
            .required(),
        Field::new("description", "Description", Textarea)
            .placeholder("Short description about your company")
            .required(),
        Field::new("copyright", "Copyright Text", Text)
            .placeholder("© 2023 Your Company. All rights reserved.")
            .required(),
    ])
    .with_sub_form("socialLinks", social_link)
}

fn site_config() -> FormSchema {
    FormSchema::new(vec![
        Field::new("siteName", "Site Name", Text).placeholder("My Website").required(),
        Field::new("siteDescription", "Site Description", Textarea)
            .placeholder("A short description of your website")
            .required(),
        Field::new("siteUrl", "Site URL", Url).placeholder("https://example.com").required(),
        Field::new("logo", "Logo URL", Text).placeholder("/logo.svg").required(),
        Field::new("favicon", "Favicon URL", Text).placeholder("/favicon.ico").required(),
    ])
}

/// Public contact form
fn inquiry() -> FormSchema {
    FormSchema::new(vec![
        Field::new("name", "Your Name", Text).placeholder("John Doe").required(),
        Field::new("email", "Email Address", Email)
            .placeholder("john@example.com")
            .required(),
        Field::new("phone", "Phone Number", Text).placeholder("+1 (555) 123-4567"),
        Field::new("subject", "Subject", Text)
            .placeholder("How can we help you?")
            .required(),
        Field::new("message", "Message", Textarea)
            .placeholder("Tell us about your project...")
            .required(),
        Field::new("projectInterest", "Project of Interest", Text),
    ])
}
