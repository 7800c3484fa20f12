pub mod login;
pub mod resource_view;
pub mod resources;
pub mod widgets;

use std::collections::HashMap;

use shelfy_core::{Books, Categories, Context, Reviews};

use crate::component::Component;
use crate::screen::ScreenId;
use crate::screens::login::LoginScreen;
use crate::screens::resource_view::ResourceView;

/// Create all screen components. Dropping them cancels their requests.
pub fn create_screens(ctx: &Context, email: Option<String>) -> HashMap<ScreenId, Box<dyn Component>> {
    let mut screens: HashMap<ScreenId, Box<dyn Component>> = HashMap::new();
    screens.insert(ScreenId::Login, Box::new(LoginScreen::new(ctx.clone(), email)));
    screens.insert(ScreenId::Books, Box::new(ResourceView::<Books>::new(ctx.clone())));
    screens.insert(
        ScreenId::Categories,
        Box::new(ResourceView::<Categories>::new(ctx.clone())),
    );
    screens.insert(
        ScreenId::Reviews,
        Box::new(ResourceView::<Reviews>::new(ctx.clone())),
    );
    screens
}
