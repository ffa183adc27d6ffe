//! Dashboard page

use leptos::prelude::*;

use crate::components::{CustomTokenCard, NetworkInfo, TokenBalancesCard, WalletCard};

#[component]
pub fn DashboardPage() -> impl IntoView {
    view! {
        <main class="dashboard">
            <div class="dashboard-column">
                <WalletCard/>
                <NetworkInfo/>
            </div>
            <div class="dashboard-column">
                <TokenBalancesCard/>
                <CustomTokenCard/>
            </div>
        </main>
    }
}
